//! Cross-platform battery state queries for juice.
//!
//! This crate provides a platform-agnostic [`BatteryQueryService`] over a
//! narrow [`PowerSource`] trait, with one adapter per battery API.
//!
//! # Features
//!
//! - `macos` - Enable macOS support (ioreg AppleSmartBattery)
//! - `linux` - Enable Linux support (sysfs power_supply)
//!
//! The `starship-battery` backed [`SystemSource`] and the
//! [`SimulatedSource`] are always available.
//!
//! # Example
//!
//! ```ignore
//! use juice_platform::{BatteryQueryService, SystemSource};
//!
//! let service = BatteryQueryService::new(SystemSource::new());
//! let snapshot = service.get_snapshot()?;
//! println!("Charge: {}", snapshot.level);
//! ```

mod battery;
mod error;
mod ioreg;
mod monitoring;
mod service;
mod simulated;
mod system;
mod types;

pub use battery::{BatterySnapshot, PowerSource};
pub use error::{BatteryError, Result};
pub use monitoring::{MonitoringGuard, MonitoringPolicy};
pub use service::BatteryQueryService;
pub use simulated::SimulatedSource;
pub use system::SystemSource;
pub use types::{BatteryLevel, PlatformStatus, PowerReading};

#[cfg(target_os = "macos")]
#[cfg(feature = "macos")]
pub mod macos;

#[cfg(target_os = "linux")]
#[cfg(feature = "linux")]
pub mod linux;
