pub mod call;
pub mod config;
pub mod debug;
pub mod query;
pub mod serve;
