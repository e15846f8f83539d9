use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{GET_BATTERY_INFO, GET_BATTERY_LEVEL};

/// A named invocation arriving over the method channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    /// Correlation id echoed back in the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            id: None,
            channel: None,
            method: method.into(),
            arguments: Value::Null,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn with_arguments(mut self, arguments: Value) -> Self {
        self.arguments = arguments;
        self
    }

    /// The known method this call names, if any.
    pub fn known_method(&self) -> Option<Method> {
        Method::from_name(&self.method)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Methods the battery channel answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GetBatteryLevel,
    GetBatteryInfo,
}

impl Method {
    pub const ALL: [Method; 2] = [Method::GetBatteryLevel, Method::GetBatteryInfo];

    /// Method names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            GET_BATTERY_LEVEL => Some(Method::GetBatteryLevel),
            GET_BATTERY_INFO => Some(Method::GetBatteryInfo),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Method::GetBatteryLevel => GET_BATTERY_LEVEL,
            Method::GetBatteryInfo => GET_BATTERY_INFO,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_call_parses() {
        let call = MethodCall::from_json(r#"{"method":"getBatteryLevel"}"#).unwrap();
        assert_eq!(call.id, None);
        assert_eq!(call.channel, None);
        assert_eq!(call.arguments, Value::Null);
        assert_eq!(call.known_method(), Some(Method::GetBatteryLevel));
    }

    #[test]
    fn test_method_names_case_sensitive() {
        assert_eq!(Method::from_name("getBatteryInfo"), Some(Method::GetBatteryInfo));
        assert_eq!(Method::from_name("GetBatteryInfo"), None);
        assert_eq!(Method::from_name("doSomethingElse"), None);
    }

    #[test]
    fn test_method_name_roundtrip() {
        for method in Method::ALL {
            assert_eq!(Method::from_name(method.name()), Some(method));
        }
    }
}
