//! Battery monitoring lifecycle.
//!
//! Some platforms only report valid battery state after observation has been
//! switched on. The service never decides on its own how long that stays on:
//! the embedder picks a [`MonitoringPolicy`], or drives it directly through
//! `enable_monitoring` / `disable_monitoring` / [`MonitoringGuard`].

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::battery::PowerSource;
use crate::error::Result;

/// How the service handles monitoring around reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MonitoringPolicy {
    /// Enable before the first read and leave it on.
    #[default]
    KeepEnabled,
    /// Enable for the duration of each read.
    PerQuery,
    /// Never touch monitoring; the embedder owns the lifecycle.
    Manual,
}

impl MonitoringPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            MonitoringPolicy::KeepEnabled => "keep-enabled",
            MonitoringPolicy::PerQuery => "per-query",
            MonitoringPolicy::Manual => "manual",
        }
    }
}

impl fmt::Display for MonitoringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Counts outstanding holds on monitoring.
///
/// The count and the enable/disable call it triggers change under one lock,
/// so no holder sees a count of one before the source has been enabled.
#[derive(Debug, Default)]
pub(crate) struct MonitoringRefs {
    active: Mutex<usize>,
}

impl MonitoringRefs {
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes one hold, enabling the source on the first.
    pub(crate) fn retain<S: PowerSource + ?Sized>(&self, source: &S) -> Result<()> {
        let mut active = self.lock();
        if *active == 0 {
            source.enable_monitoring()?;
            debug!(source = source.name(), "monitoring enabled");
        }
        *active += 1;
        Ok(())
    }

    /// Gives back one hold, disabling the source after the last.
    pub(crate) fn release<S: PowerSource + ?Sized>(&self, source: &S) {
        let mut active = self.lock();
        let count = *active;
        match count {
            0 => {}
            1 => {
                *active = 0;
                match source.disable_monitoring() {
                    Ok(()) => debug!(source = source.name(), "monitoring disabled"),
                    Err(e) => {
                        warn!(source = source.name(), error = %e, "failed to disable monitoring")
                    }
                }
            }
            n => *active = n - 1,
        }
    }

    pub(crate) fn acquire<'a, S: PowerSource + ?Sized>(
        &'a self,
        source: &'a S,
    ) -> Result<MonitoringGuard<'a, S>> {
        self.retain(source)?;
        Ok(MonitoringGuard { refs: self, source })
    }

    pub(crate) fn active(&self) -> usize {
        *self.lock()
    }
}

/// Keeps monitoring enabled while alive.
///
/// Monitoring is disabled when the last outstanding guard is dropped.
#[must_use = "monitoring is released as soon as the guard is dropped"]
pub struct MonitoringGuard<'a, S: PowerSource + ?Sized> {
    refs: &'a MonitoringRefs,
    source: &'a S,
}

impl<S: PowerSource + ?Sized> fmt::Debug for MonitoringGuard<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitoringGuard")
            .field("source", &self.source.name())
            .field("active", &self.refs.active())
            .finish()
    }
}

impl<S: PowerSource + ?Sized> Drop for MonitoringGuard<'_, S> {
    fn drop(&mut self) {
        self.refs.release(self.source);
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::simulated::SimulatedSource;
    use crate::types::PlatformStatus;

    #[test]
    fn test_policy_labels() {
        assert_eq!(MonitoringPolicy::default(), MonitoringPolicy::KeepEnabled);
        assert_eq!(MonitoringPolicy::KeepEnabled.to_string(), "keep-enabled");
        assert_eq!(MonitoringPolicy::PerQuery.label(), "per-query");
        assert_eq!(MonitoringPolicy::Manual.label(), "manual");
    }

    #[test]
    fn test_nested_guards_share_one_enable() {
        let source = SimulatedSource::new(50, PlatformStatus::Charging).with_monitoring_required();
        let refs = MonitoringRefs::default();

        let outer = refs.acquire(&source).unwrap();
        let inner = refs.acquire(&source).unwrap();
        assert_eq!(refs.active(), 2);
        assert!(source.is_monitoring());

        drop(inner);
        assert!(source.is_monitoring());
        drop(outer);
        assert!(!source.is_monitoring());

        assert_eq!(source.enable_calls(), 1);
        assert_eq!(source.disable_calls(), 1);
    }

    #[test]
    fn test_release_without_hold_is_ignored() {
        let source = SimulatedSource::new(50, PlatformStatus::Charging).with_monitoring_required();
        let refs = MonitoringRefs::default();

        refs.release(&source);
        assert_eq!(refs.active(), 0);
        assert_eq!(source.disable_calls(), 0);

        refs.retain(&source).unwrap();
        refs.release(&source);
        refs.release(&source);
        assert_eq!(source.disable_calls(), 1);
    }

    #[test]
    fn test_second_holder_waits_for_enable() {
        struct SlowEnable(SimulatedSource);

        impl PowerSource for SlowEnable {
            fn name(&self) -> &'static str {
                "slow"
            }

            fn read_power_state(&self) -> Result<crate::types::PowerReading> {
                self.0.read_power_state()
            }

            fn enable_monitoring(&self) -> Result<()> {
                thread::sleep(Duration::from_millis(200));
                self.0.enable_monitoring()
            }

            fn disable_monitoring(&self) -> Result<()> {
                self.0.disable_monitoring()
            }
        }

        let source = SlowEnable(
            SimulatedSource::new(50, PlatformStatus::Charging).with_monitoring_required(),
        );
        let refs = MonitoringRefs::default();

        thread::scope(|s| {
            let first = s.spawn(|| {
                let _guard = refs.acquire(&source).unwrap();
                thread::sleep(Duration::from_millis(100));
            });
            thread::sleep(Duration::from_millis(50));
            let second = s.spawn(|| {
                let _guard = refs.acquire(&source).unwrap();
                source.0.is_monitoring()
            });

            assert!(second.join().unwrap());
            first.join().unwrap();
        });

        assert_eq!(refs.active(), 0);
        assert!(!source.0.is_monitoring());
        assert_eq!(source.0.enable_calls(), 1);
        assert_eq!(source.0.disable_calls(), 1);
    }
}
