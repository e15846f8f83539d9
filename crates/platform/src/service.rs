//! Battery query service.
//!
//! Wraps a [`PowerSource`] and normalizes whatever it reports into a
//! [`BatteryLevel`] or [`BatterySnapshot`]. Indeterminate state is recovered
//! here into the unknown marker; only an unreachable platform is returned as
//! an error.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, warn};

use crate::battery::{effective_level, BatterySnapshot, PowerSource};
use crate::error::{BatteryError, Result};
use crate::monitoring::{MonitoringGuard, MonitoringPolicy, MonitoringRefs};
use crate::types::{BatteryLevel, PowerReading};

pub struct BatteryQueryService<S: PowerSource> {
    source: S,
    policy: MonitoringPolicy,
    refs: MonitoringRefs,
    holds: Mutex<Holds>,
}

/// Long-lived holds on `refs`, besides outstanding guards.
#[derive(Debug, Default)]
struct Holds {
    /// Taken by `enable_monitoring`.
    explicit: bool,
    /// Taken by the first read under `KeepEnabled`.
    kept: bool,
}

impl<S: PowerSource> BatteryQueryService<S> {
    pub fn new(source: S) -> Self {
        Self::with_policy(source, MonitoringPolicy::default())
    }

    pub fn with_policy(source: S, policy: MonitoringPolicy) -> Self {
        Self {
            source,
            policy,
            refs: MonitoringRefs::default(),
            holds: Mutex::default(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn policy(&self) -> MonitoringPolicy {
        self.policy
    }

    /// Current battery percentage, or [`BatteryLevel::Unknown`].
    pub fn get_level(&self) -> Result<BatteryLevel> {
        Ok(match self.read()? {
            Some(reading) => effective_level(reading),
            None => BatteryLevel::Unknown,
        })
    }

    /// Level, charging and plugged-in flags from one platform read.
    pub fn get_snapshot(&self) -> Result<BatterySnapshot> {
        Ok(match self.read()? {
            Some(reading) => BatterySnapshot::from_reading(reading),
            None => BatterySnapshot::unknown(),
        })
    }

    /// Raw reading without level normalization, for diagnostics.
    pub fn read_raw(&self) -> Result<PowerReading> {
        self.with_monitoring(|| self.source.read_power_state())
    }

    /// Holds monitoring on until [`disable_monitoring`](Self::disable_monitoring).
    ///
    /// Calling it again while already held is a no-op.
    pub fn enable_monitoring(&self) -> Result<()> {
        let mut holds = self.holds();
        if !holds.explicit {
            self.refs.retain(&self.source)?;
            holds.explicit = true;
        }
        Ok(())
    }

    /// Drops the hold taken by `enable_monitoring` and the one kept by
    /// `KeepEnabled`. Outstanding guards still keep monitoring on.
    pub fn disable_monitoring(&self) -> Result<()> {
        let mut holds = self.holds();
        if std::mem::take(&mut holds.explicit) {
            self.refs.release(&self.source);
        }
        if std::mem::take(&mut holds.kept) {
            self.refs.release(&self.source);
        }
        Ok(())
    }

    /// Holds monitoring on until the guard is dropped.
    pub fn monitor(&self) -> Result<MonitoringGuard<'_, S>> {
        self.refs.acquire(&self.source)
    }

    /// `Ok(None)` means the platform answered with an unknown state.
    fn read(&self) -> Result<Option<PowerReading>> {
        match self.read_raw() {
            Ok(reading) => {
                debug!(
                    source = self.source.name(),
                    level = %reading.level,
                    status = %reading.status,
                    "power state read"
                );
                Ok(Some(reading))
            }
            Err(BatteryError::UnknownPowerState { reason }) => {
                warn!(source = self.source.name(), %reason, "power state unknown");
                Ok(None)
            }
            Err(e) => {
                error!(source = self.source.name(), error = %e, "power state read failed");
                Err(e)
            }
        }
    }

    fn holds(&self) -> MutexGuard<'_, Holds> {
        self.holds.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_monitoring<T>(&self, read: impl FnOnce() -> Result<T>) -> Result<T> {
        if !self.source.requires_monitoring() {
            return read();
        }

        match self.policy {
            MonitoringPolicy::KeepEnabled => {
                {
                    let mut holds = self.holds();
                    if !holds.kept {
                        self.refs.retain(&self.source)?;
                        holds.kept = true;
                    }
                }
                read()
            }
            MonitoringPolicy::PerQuery => {
                let _guard = self.monitor()?;
                read()
            }
            MonitoringPolicy::Manual => read(),
        }
    }
}
