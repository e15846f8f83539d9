//! Shared types for battery state queries.

use std::fmt;

use juice_protocol::UNKNOWN_LEVEL;
use serde::{Deserialize, Serialize};

/// Coarse power state reported by the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformStatus {
    /// Battery is actively charging
    Charging,
    /// Battery is full with external power attached
    Full,
    /// External power connected but not charging (e.g., charge limit reached)
    NotCharging,
    /// Battery is discharging (on battery power)
    Discharging,
    /// State cannot be determined
    #[default]
    Unknown,
}

impl PlatformStatus {
    pub const ALL: [PlatformStatus; 5] = [
        PlatformStatus::Charging,
        PlatformStatus::Full,
        PlatformStatus::NotCharging,
        PlatformStatus::Discharging,
        PlatformStatus::Unknown,
    ];

    /// Returns a human-readable label for the status.
    pub fn label(&self) -> &'static str {
        match self {
            PlatformStatus::Charging => "Charging",
            PlatformStatus::Full => "Full",
            PlatformStatus::NotCharging => "Not Charging",
            PlatformStatus::Discharging => "On Battery",
            PlatformStatus::Unknown => "Unknown",
        }
    }

    /// Returns true if the battery is charging or full with power attached.
    pub fn is_charging(&self) -> bool {
        matches!(self, PlatformStatus::Charging | PlatformStatus::Full)
    }

    /// Returns true if external power is connected.
    ///
    /// `Unknown` counts as unplugged.
    pub fn is_plugged_in(&self) -> bool {
        matches!(
            self,
            PlatformStatus::Charging | PlatformStatus::Full | PlatformStatus::NotCharging
        )
    }

    /// Parses a Linux power_supply `status` attribute.
    pub fn from_sysfs(status: &str) -> Self {
        match status.trim() {
            s if s.eq_ignore_ascii_case("Charging") => PlatformStatus::Charging,
            s if s.eq_ignore_ascii_case("Full") => PlatformStatus::Full,
            s if s.eq_ignore_ascii_case("Not charging") => PlatformStatus::NotCharging,
            s if s.eq_ignore_ascii_case("Discharging") => PlatformStatus::Discharging,
            _ => PlatformStatus::Unknown,
        }
    }
}

impl fmt::Display for PlatformStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<starship_battery::State> for PlatformStatus {
    fn from(state: starship_battery::State) -> Self {
        match state {
            starship_battery::State::Charging => PlatformStatus::Charging,
            starship_battery::State::Discharging => PlatformStatus::Discharging,
            starship_battery::State::Empty => PlatformStatus::Discharging,
            starship_battery::State::Full => PlatformStatus::Full,
            starship_battery::State::Unknown => PlatformStatus::Unknown,
        }
    }
}

/// Battery charge level.
///
/// Platform sentinels (negative placeholders, values above 100, NaN) are
/// never carried as a percentage; they become [`BatteryLevel::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryLevel {
    Percent(u8),
    #[default]
    Unknown,
}

impl BatteryLevel {
    /// From an integer reading such as sysfs `capacity`.
    pub fn from_raw(raw: i64) -> Self {
        match u8::try_from(raw) {
            Ok(p) if p <= 100 => BatteryLevel::Percent(p),
            _ => BatteryLevel::Unknown,
        }
    }

    /// From a fractional percentage, rounded to the nearest integer.
    pub fn from_percent(percent: f32) -> Self {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return BatteryLevel::Unknown;
        }
        BatteryLevel::Percent(percent.round() as u8)
    }

    /// From a 0.0-1.0 ratio, the way UIKit and starship-battery report charge.
    pub fn from_fraction(fraction: f32) -> Self {
        if !fraction.is_finite() {
            return BatteryLevel::Unknown;
        }
        Self::from_percent(fraction * 100.0)
    }

    /// Integer for the method channel: the percentage, or `-1` when unknown.
    pub fn to_wire(&self) -> i32 {
        match self {
            BatteryLevel::Percent(p) => i32::from(*p),
            BatteryLevel::Unknown => UNKNOWN_LEVEL,
        }
    }
}

impl fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatteryLevel::Percent(p) => write!(f, "{}%", p),
            BatteryLevel::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One read of the platform power subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PowerReading {
    pub level: BatteryLevel,
    pub status: PlatformStatus,
}

impl PowerReading {
    pub fn new(level: BatteryLevel, status: PlatformStatus) -> Self {
        Self { level, status }
    }

    /// Reading for a platform that answered but has nothing to report.
    pub fn unknown() -> Self {
        Self::default()
    }
}
