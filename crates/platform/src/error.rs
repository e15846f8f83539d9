//! Errors that can cross the battery service boundary.

use std::io;

/// Failure kinds for battery queries and method dispatch.
///
/// Adapters translate their native errors into one of these before
/// returning, so callers never see an OS-specific error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum BatteryError {
    /// The platform answered but cannot report battery status
    /// (no battery, emulator, monitoring not permitted).
    #[error("power state unknown: {reason}")]
    UnknownPowerState { reason: String },

    /// The caller asked for an operation that does not exist.
    #[error("method not implemented: {method}")]
    NotImplemented { method: String },

    /// The platform power service could not be reached at all.
    #[error("power subsystem unavailable: {reason}")]
    PlatformUnavailable { reason: String },
}

pub type Result<T> = std::result::Result<T, BatteryError>;

impl BatteryError {
    pub fn unknown(reason: impl Into<String>) -> Self {
        BatteryError::UnknownPowerState {
            reason: reason.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        BatteryError::PlatformUnavailable {
            reason: reason.into(),
        }
    }

    pub fn not_implemented(method: impl Into<String>) -> Self {
        BatteryError::NotImplemented {
            method: method.into(),
        }
    }

    /// Stable code used on the method channel.
    pub fn code(&self) -> &'static str {
        match self {
            BatteryError::UnknownPowerState { .. } => "UNKNOWN_POWER_STATE",
            BatteryError::NotImplemented { .. } => "NOT_IMPLEMENTED",
            BatteryError::PlatformUnavailable { .. } => "UNAVAILABLE",
        }
    }

    /// Maps an I/O error from reading a power attribute.
    ///
    /// Missing attributes mean the device has nothing to report; permission
    /// failures mean the question cannot be asked.
    pub fn from_io(context: &str, err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => {
                BatteryError::unavailable(format!("{}: {}", context, err))
            }
            _ => BatteryError::unknown(format!("{}: {}", context, err)),
        }
    }
}

impl From<starship_battery::Error> for BatteryError {
    fn from(err: starship_battery::Error) -> Self {
        BatteryError::unavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(BatteryError::unknown("x").code(), "UNKNOWN_POWER_STATE");
        assert_eq!(BatteryError::not_implemented("x").code(), "NOT_IMPLEMENTED");
        assert_eq!(BatteryError::unavailable("x").code(), "UNAVAILABLE");
    }

    #[test]
    fn test_io_mapping() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(
            BatteryError::from_io("capacity", &denied),
            BatteryError::PlatformUnavailable { .. }
        ));

        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            BatteryError::from_io("capacity", &missing),
            BatteryError::UnknownPowerState { .. }
        ));
    }

    #[test]
    fn test_display_includes_method() {
        let err = BatteryError::not_implemented("doSomethingElse");
        assert_eq!(err.to_string(), "method not implemented: doSomethingElse");
    }
}
