//! Parser for `ioreg -rn AppleSmartBattery` output.
//!
//! Kept platform independent so it can be tested on any host.

#![cfg_attr(not(all(target_os = "macos", feature = "macos")), allow(dead_code))]

use crate::types::{BatteryLevel, PlatformStatus, PowerReading};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct SmartBattery {
    current_capacity: Option<i64>,
    max_capacity: Option<i64>,
    external_connected: bool,
    is_charging: bool,
    fully_charged: bool,
}

/// Returns `None` when the output holds no battery entry.
pub(crate) fn parse_smart_battery(output: &str) -> Option<PowerReading> {
    let mut battery = SmartBattery::default();
    let mut seen = false;

    for line in output.lines() {
        let line = line.trim();
        let Some(key) = quoted_key(line) else {
            continue;
        };

        match key {
            "CurrentCapacity" => {
                battery.current_capacity = extract_number(line);
                seen = true;
            }
            "MaxCapacity" => battery.max_capacity = extract_number(line),
            "ExternalConnected" => battery.external_connected = extract_flag(line),
            "IsCharging" => battery.is_charging = extract_flag(line),
            "FullyCharged" => battery.fully_charged = extract_flag(line),
            _ => {}
        }
    }

    if !seen {
        return None;
    }

    Some(PowerReading::new(battery.level(), battery.status()))
}

impl SmartBattery {
    // Apple Silicon reports CurrentCapacity as a percentage with MaxCapacity
    // of 100; Intel machines report mAh for both, and the gauge can read
    // slightly above MaxCapacity once calibrated at full charge.
    fn level(&self) -> BatteryLevel {
        match (self.current_capacity, self.max_capacity) {
            (Some(current), Some(max)) if max > 0 && current >= 0 => {
                let current = current.min(max);
                BatteryLevel::from_percent(current as f32 / max as f32 * 100.0)
            }
            (Some(current), None) => BatteryLevel::from_raw(current),
            _ => BatteryLevel::Unknown,
        }
    }

    fn status(&self) -> PlatformStatus {
        if !self.external_connected {
            PlatformStatus::Discharging
        } else if self.is_charging {
            PlatformStatus::Charging
        } else if self.fully_charged {
            PlatformStatus::Full
        } else {
            PlatformStatus::NotCharging
        }
    }
}

/// Key of a top-level `"Key" = value` line.
fn quoted_key(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('"')?;
    let end = rest.find('"')?;
    let after = rest[end + 1..].trim_start();
    if !after.starts_with('=') {
        return None;
    }
    Some(&rest[..end])
}

fn extract_number(line: &str) -> Option<i64> {
    line.split('=').nth(1)?.trim().parse::<i64>().ok()
}

fn extract_flag(line: &str) -> bool {
    line.split('=')
        .nth(1)
        .map(|v| v.trim() == "Yes")
        .unwrap_or(false)
}
