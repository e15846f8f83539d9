//! Cross-platform source backed by `starship-battery`.

use starship_battery::units::ratio::percent;
use starship_battery::Manager;

use crate::battery::PowerSource;
use crate::error::{BatteryError, Result};
use crate::types::{BatteryLevel, PlatformStatus, PowerReading};

/// Reads the first battery the OS reports.
///
/// A `Manager` is created per read: it holds platform handles that are not
/// `Sync` everywhere, and queries are single-shot anyway.
#[derive(Debug, Default)]
pub struct SystemSource;

impl SystemSource {
    pub fn new() -> Self {
        Self
    }

    /// Check if a battery is available on this system.
    pub fn is_available() -> bool {
        Manager::new()
            .ok()
            .and_then(|m| m.batteries().ok())
            .and_then(|mut b| b.next())
            .and_then(|b| b.ok())
            .is_some()
    }
}

impl PowerSource for SystemSource {
    fn name(&self) -> &'static str {
        "system"
    }

    fn read_power_state(&self) -> Result<PowerReading> {
        let manager = Manager::new()?;
        let battery = manager
            .batteries()?
            .next()
            .ok_or_else(|| BatteryError::unknown("no battery found"))?
            .map_err(|e| BatteryError::unknown(e.to_string()))?;

        let level = BatteryLevel::from_percent(battery.state_of_charge().get::<percent>());
        let status = PlatformStatus::from(battery.state());

        Ok(PowerReading::new(level, status))
    }
}
