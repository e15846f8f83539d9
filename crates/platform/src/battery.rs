//! Battery snapshot and the platform source trait.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{BatteryLevel, PlatformStatus, PowerReading};

/// Battery state at one instant.
///
/// Built from a single [`PowerReading`], so level and flags always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatterySnapshot {
    pub level: BatteryLevel,
    pub is_charging: bool,
    pub is_plugged_in: bool,
}

impl BatterySnapshot {
    pub fn from_reading(reading: PowerReading) -> Self {
        Self {
            level: effective_level(reading),
            is_charging: reading.status.is_charging(),
            is_plugged_in: reading.status.is_plugged_in(),
        }
    }

    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Level as exposed to callers: an unknown status hides whatever number the
/// platform returned alongside it.
pub(crate) fn effective_level(reading: PowerReading) -> BatteryLevel {
    match reading.status {
        PlatformStatus::Unknown => BatteryLevel::Unknown,
        _ => reading.level,
    }
}

/// An adapter over one operating system battery API.
///
/// `read_power_state` must read level and status together in one call.
pub trait PowerSource: Send + Sync {
    /// Short identifier used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Read the current power state.
    fn read_power_state(&self) -> Result<PowerReading>;

    /// Whether reads are only valid while monitoring is enabled.
    fn requires_monitoring(&self) -> bool {
        false
    }

    fn enable_monitoring(&self) -> Result<()> {
        Ok(())
    }

    fn disable_monitoring(&self) -> Result<()> {
        Ok(())
    }
}

impl<S: PowerSource + ?Sized> PowerSource for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn read_power_state(&self) -> Result<PowerReading> {
        (**self).read_power_state()
    }

    fn requires_monitoring(&self) -> bool {
        (**self).requires_monitoring()
    }

    fn enable_monitoring(&self) -> Result<()> {
        (**self).enable_monitoring()
    }

    fn disable_monitoring(&self) -> Result<()> {
        (**self).disable_monitoring()
    }
}

impl<S: PowerSource + ?Sized> PowerSource for Arc<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn read_power_state(&self) -> Result<PowerReading> {
        (**self).read_power_state()
    }

    fn requires_monitoring(&self) -> bool {
        (**self).requires_monitoring()
    }

    fn enable_monitoring(&self) -> Result<()> {
        (**self).enable_monitoring()
    }

    fn disable_monitoring(&self) -> Result<()> {
        (**self).disable_monitoring()
    }
}
