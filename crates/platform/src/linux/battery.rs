use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::battery::PowerSource;
use crate::error::{BatteryError, Result};
use crate::types::{BatteryLevel, PlatformStatus, PowerReading};

const POWER_SUPPLY_PATH: &str = "/sys/class/power_supply";

/// Reads `/sys/class/power_supply` directly.
#[derive(Debug, Clone)]
pub struct SysfsSource {
    root: PathBuf,
}

impl Default for SysfsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SysfsSource {
    pub fn new() -> Self {
        Self::with_root(POWER_SUPPLY_PATH)
    }

    /// Use an alternate power_supply directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn is_supported() -> bool {
        Path::new(POWER_SUPPLY_PATH).exists()
    }

    fn list_supplies(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.root).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                BatteryError::unavailable(format!("{}: {}", self.root.display(), e))
            }
            _ => BatteryError::from_io("power_supply", &e),
        })?;

        let mut supplies: Vec<PathBuf> = entries.flatten().map(|entry| entry.path()).collect();
        supplies.sort();
        Ok(supplies)
    }
}

impl PowerSource for SysfsSource {
    fn name(&self) -> &'static str {
        "sysfs"
    }

    fn read_power_state(&self) -> Result<PowerReading> {
        let supplies = self.list_supplies()?;

        let battery_path = supplies
            .iter()
            .find(|path| supply_type(path).as_deref() == Some("Battery"))
            .ok_or_else(|| BatteryError::unknown("no battery in power_supply"))?;

        let status = fs::read_to_string(battery_path.join("status"))
            .map_err(|e| BatteryError::from_io("status", &e))?;
        let mut status = PlatformStatus::from_sysfs(&status);

        let level = match fs::read_to_string(battery_path.join("capacity")) {
            Ok(content) => content
                .trim()
                .parse::<i64>()
                .map(BatteryLevel::from_raw)
                .unwrap_or(BatteryLevel::Unknown),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(BatteryError::from_io("capacity", &e));
            }
            Err(_) => BatteryLevel::Unknown,
        };

        // Some drivers keep reporting Discharging with a charge limit active.
        if matches!(
            status,
            PlatformStatus::Discharging | PlatformStatus::Unknown
        ) && external_power_online(&supplies)
        {
            status = PlatformStatus::NotCharging;
        }

        trace!(path = %battery_path.display(), %level, %status, "sysfs battery");
        Ok(PowerReading::new(level, status))
    }
}

fn supply_type(path: &Path) -> Option<String> {
    fs::read_to_string(path.join("type"))
        .ok()
        .map(|t| t.trim().to_string())
}

fn external_power_online(supplies: &[PathBuf]) -> bool {
    supplies.iter().any(|path| {
        matches!(supply_type(path).as_deref(), Some("Mains") | Some("USB"))
            && fs::read_to_string(path.join("online"))
                .map(|online| online.trim() == "1")
                .unwrap_or(false)
    })
}
