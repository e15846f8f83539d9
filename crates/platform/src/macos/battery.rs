use std::process::Command;

use tracing::trace;

use crate::battery::PowerSource;
use crate::error::{BatteryError, Result};
use crate::ioreg::parse_smart_battery;
use crate::types::PowerReading;

/// Reads AppleSmartBattery through `ioreg`.
///
/// Unlike the IOKit power-source API, ioreg distinguishes "connected but
/// not charging" from "full".
#[derive(Debug, Default, Clone)]
pub struct IoregSource;

impl IoregSource {
    pub fn new() -> Self {
        Self
    }
}

impl PowerSource for IoregSource {
    fn name(&self) -> &'static str {
        "ioreg"
    }

    fn read_power_state(&self) -> Result<PowerReading> {
        let output = Command::new("ioreg")
            .args(["-rn", "AppleSmartBattery"])
            .output()
            .map_err(|e| BatteryError::unavailable(format!("ioreg: {}", e)))?;

        if !output.status.success() {
            return Err(BatteryError::unavailable(format!(
                "ioreg exited with {}",
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        trace!(bytes = stdout.len(), "ioreg output");
        parse_smart_battery(&stdout)
            .ok_or_else(|| BatteryError::unknown("no AppleSmartBattery entry"))
    }
}
