use clap::ValueEnum;
use color_eyre::eyre::{eyre, Result};
use juice_platform::{PowerSource, SimulatedSource, SystemSource};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which battery API to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Best native source for this OS
    #[default]
    Auto,
    /// Linux /sys/class/power_supply
    Sysfs,
    /// macOS ioreg AppleSmartBattery
    Ioreg,
    /// starship-battery (any OS)
    System,
    /// Fixed in-process values
    Simulated,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Auto => "auto",
            SourceKind::Sysfs => "sysfs",
            SourceKind::Ioreg => "ioreg",
            SourceKind::System => "system",
            SourceKind::Simulated => "simulated",
        }
    }
}

/// Builds the power source for `kind`.
///
/// `simulate` is a `status:level` pair and forces the simulated source.
pub fn build(kind: SourceKind, simulate: Option<&str>) -> Result<Box<dyn PowerSource>> {
    if let Some(sim) = simulate {
        let source = SimulatedSource::parse(sim).ok_or_else(|| {
            eyre!(
                "Invalid simulation '{}', expected status:level (e.g. charging:80)",
                sim
            )
        })?;
        return Ok(Box::new(source));
    }

    let kind = match kind {
        SourceKind::Auto => auto_kind(),
        other => other,
    };
    debug!(source = kind.label(), "selected power source");

    match kind {
        SourceKind::Sysfs => sysfs(),
        SourceKind::Ioreg => ioreg(),
        SourceKind::System | SourceKind::Auto => Ok(Box::new(SystemSource::new())),
        SourceKind::Simulated => Ok(Box::new(SimulatedSource::default())),
    }
}

#[cfg(all(target_os = "linux", feature = "linux"))]
fn auto_kind() -> SourceKind {
    if juice_platform::linux::SysfsSource::is_supported() {
        SourceKind::Sysfs
    } else {
        SourceKind::System
    }
}

#[cfg(all(target_os = "macos", feature = "macos"))]
fn auto_kind() -> SourceKind {
    SourceKind::Ioreg
}

#[cfg(not(any(
    all(target_os = "linux", feature = "linux"),
    all(target_os = "macos", feature = "macos")
)))]
fn auto_kind() -> SourceKind {
    SourceKind::System
}

#[cfg(all(target_os = "linux", feature = "linux"))]
fn sysfs() -> Result<Box<dyn PowerSource>> {
    Ok(Box::new(juice_platform::linux::SysfsSource::new()))
}

#[cfg(not(all(target_os = "linux", feature = "linux")))]
fn sysfs() -> Result<Box<dyn PowerSource>> {
    Err(eyre!("sysfs source requires Linux and the `linux` feature"))
}

#[cfg(all(target_os = "macos", feature = "macos"))]
fn ioreg() -> Result<Box<dyn PowerSource>> {
    Ok(Box::new(juice_platform::macos::IoregSource::new()))
}

#[cfg(not(all(target_os = "macos", feature = "macos")))]
fn ioreg() -> Result<Box<dyn PowerSource>> {
    Err(eyre!("ioreg source requires macOS and the `macos` feature"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use juice_platform::{BatteryLevel, PlatformStatus};

    #[test]
    fn test_simulate_overrides_kind() {
        let source = build(SourceKind::Sysfs, Some("not-charging:77")).unwrap();
        assert_eq!(source.name(), "simulated");

        let reading = source.read_power_state().unwrap();
        assert_eq!(reading.status, PlatformStatus::NotCharging);
        assert_eq!(reading.level, BatteryLevel::Percent(77));
    }

    #[test]
    fn test_invalid_simulation_rejected() {
        assert!(build(SourceKind::Auto, Some("nonsense")).is_err());
    }

    #[test]
    fn test_explicit_kinds() {
        assert_eq!(build(SourceKind::Simulated, None).unwrap().name(), "simulated");
        assert_eq!(build(SourceKind::System, None).unwrap().name(), "system");
    }
}
