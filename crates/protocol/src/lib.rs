mod request;
mod response;
mod types;

pub use request::{Method, MethodCall};
pub use response::{codes, MethodOutcome, MethodResponse};
pub use types::{BatteryInfo, DEFAULT_CHANNEL, GET_BATTERY_INFO, GET_BATTERY_LEVEL, UNKNOWN_LEVEL};
