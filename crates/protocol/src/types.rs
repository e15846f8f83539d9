use serde::{Deserialize, Serialize};

/// Channel name the original mobile shims registered.
pub const DEFAULT_CHANNEL: &str = "samples.flutter.dev/battery";

pub const GET_BATTERY_LEVEL: &str = "getBatteryLevel";
pub const GET_BATTERY_INFO: &str = "getBatteryInfo";

/// Level reported when the platform cannot determine the charge.
pub const UNKNOWN_LEVEL: i32 = -1;

/// Result record of `getBatteryInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatteryInfo {
    pub level: i32,
    pub is_charging: bool,
    pub is_plugged_in: bool,
}

impl BatteryInfo {
    pub fn unknown() -> Self {
        Self {
            level: UNKNOWN_LEVEL,
            is_charging: false,
            is_plugged_in: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_info_keys() {
        let info = BatteryInfo {
            level: 87,
            is_charging: true,
            is_plugged_in: true,
        };
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"level": 87, "isCharging": true, "isPluggedIn": true})
        );
    }

    #[test]
    fn test_unknown_info() {
        let info = BatteryInfo::unknown();
        assert_eq!(info.level, UNKNOWN_LEVEL);
        assert!(!info.is_charging && !info.is_plugged_in);
    }
}
