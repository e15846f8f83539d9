use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error codes carried in [`MethodOutcome::Error`].
pub mod codes {
    /// The platform power service could not be reached.
    pub const UNAVAILABLE: &str = "UNAVAILABLE";
    /// The request line was not a valid method call.
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    /// The call named a channel this server does not own.
    pub const UNKNOWN_CHANNEL: &str = "UNKNOWN_CHANNEL";
    /// The handler failed before producing a result.
    pub const INTERNAL: &str = "INTERNAL";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(flatten)]
    pub outcome: MethodOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodOutcome {
    Success {
        result: Value,
    },
    Error {
        code: String,
        message: String,
        #[serde(default)]
        details: Value,
    },
    NotImplemented,
}

impl MethodResponse {
    pub fn success(result: Value) -> Self {
        Self {
            id: None,
            outcome: MethodOutcome::Success { result },
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: None,
            outcome: MethodOutcome::Error {
                code: code.into(),
                message: message.into(),
                details: Value::Null,
            },
        }
    }

    pub fn not_implemented() -> Self {
        Self {
            id: None,
            outcome: MethodOutcome::NotImplemented,
        }
    }

    pub fn with_id(mut self, id: Option<u64>) -> Self {
        self.id = id;
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        if let MethodOutcome::Error { details: d, .. } = &mut self.outcome {
            *d = details;
        }
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, MethodOutcome::Success { .. })
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            MethodOutcome::Success { result } => Some(result),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
