//! In-process power source with settable state.
//!
//! Useful for embedders running on hosts without a battery, and for tests.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::battery::PowerSource;
use crate::error::{BatteryError, Result};
use crate::types::{BatteryLevel, PlatformStatus, PowerReading};

#[derive(Debug)]
pub struct SimulatedSource {
    raw_level: AtomicI64,
    status: Mutex<PlatformStatus>,
    failure: Mutex<Option<BatteryError>>,
    monitoring_required: bool,
    monitoring: AtomicBool,
    reads: AtomicUsize,
    enable_calls: AtomicUsize,
    disable_calls: AtomicUsize,
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new(100, PlatformStatus::Full)
    }
}

impl SimulatedSource {
    /// `raw_level` is taken as the platform would report it, so out of range
    /// values such as `-1` are allowed.
    pub fn new(raw_level: i64, status: PlatformStatus) -> Self {
        Self {
            raw_level: AtomicI64::new(raw_level),
            status: Mutex::new(status),
            failure: Mutex::new(None),
            monitoring_required: false,
            monitoring: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
            enable_calls: AtomicUsize::new(0),
            disable_calls: AtomicUsize::new(0),
        }
    }

    /// Reads report unknown state until monitoring is enabled.
    pub fn with_monitoring_required(mut self) -> Self {
        self.monitoring_required = true;
        self
    }

    /// Parses `status:level`, e.g. `charging:80` or `unknown:-1`.
    pub fn parse(input: &str) -> Option<Self> {
        let (status, level) = input.split_once(':')?;
        let status = match status.trim().to_lowercase().as_str() {
            "charging" => PlatformStatus::Charging,
            "full" => PlatformStatus::Full,
            "not-charging" | "not_charging" | "notcharging" => PlatformStatus::NotCharging,
            "discharging" | "unplugged" => PlatformStatus::Discharging,
            "unknown" => PlatformStatus::Unknown,
            _ => return None,
        };
        let level = level.trim().parse::<i64>().ok()?;
        Some(Self::new(level, status))
    }

    pub fn set_level(&self, raw_level: i64) {
        self.raw_level.store(raw_level, Ordering::SeqCst);
    }

    pub fn set_status(&self, status: PlatformStatus) {
        if let Ok(mut current) = self.status.lock() {
            *current = status;
        }
    }

    /// Makes every subsequent read fail with `err` until cleared with `None`.
    pub fn set_failure(&self, err: Option<BatteryError>) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = err;
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn enable_calls(&self) -> usize {
        self.enable_calls.load(Ordering::SeqCst)
    }

    pub fn disable_calls(&self) -> usize {
        self.disable_calls.load(Ordering::SeqCst)
    }
}

impl PowerSource for SimulatedSource {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn read_power_state(&self) -> Result<PowerReading> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.failure.lock().ok().and_then(|f| f.clone()) {
            return Err(err);
        }

        if self.monitoring_required && !self.is_monitoring() {
            return Ok(PowerReading::unknown());
        }

        let status = self
            .status
            .lock()
            .map(|s| *s)
            .unwrap_or(PlatformStatus::Unknown);
        let level = BatteryLevel::from_raw(self.raw_level.load(Ordering::SeqCst));
        Ok(PowerReading::new(level, status))
    }

    fn requires_monitoring(&self) -> bool {
        self.monitoring_required
    }

    fn enable_monitoring(&self) -> Result<()> {
        self.enable_calls.fetch_add(1, Ordering::SeqCst);
        self.monitoring.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn disable_monitoring(&self) -> Result<()> {
        self.disable_calls.fetch_add(1, Ordering::SeqCst);
        self.monitoring.store(false, Ordering::SeqCst);
        Ok(())
    }
}
