//! Method channel dispatch.
//!
//! Maps method names arriving from the embedding layer onto the battery
//! query service and turns results into wire responses.

use juice_platform::{BatteryError, BatteryQueryService, BatterySnapshot, PowerSource};
use juice_protocol::{codes, BatteryInfo, Method, MethodCall, MethodResponse};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

pub struct MethodHandler<S: PowerSource> {
    service: BatteryQueryService<S>,
    channel: String,
}

impl<S: PowerSource> MethodHandler<S> {
    pub fn new(service: BatteryQueryService<S>, channel: impl Into<String>) -> Self {
        Self {
            service,
            channel: channel.into(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn service(&self) -> &BatteryQueryService<S> {
        &self.service
    }

    /// Runs a call and returns its raw result value.
    pub fn dispatch(&self, call: &MethodCall) -> Result<Value, BatteryError> {
        match call.known_method() {
            Some(Method::GetBatteryLevel) => {
                let level = self.service.get_level()?;
                Ok(json!(level.to_wire()))
            }
            Some(Method::GetBatteryInfo) => {
                let snapshot = self.service.get_snapshot()?;
                Ok(json!(battery_info(&snapshot)))
            }
            None => Err(BatteryError::not_implemented(&call.method)),
        }
    }

    pub fn handle(&self, call: &MethodCall) -> MethodResponse {
        if let Some(channel) = call.channel.as_deref() {
            if channel != self.channel {
                warn!(channel, expected = %self.channel, "call for unknown channel");
                return MethodResponse::error(
                    codes::UNKNOWN_CHANNEL,
                    format!("no handler registered for channel '{}'", channel),
                )
                .with_id(call.id);
            }
        }

        let response = match self.dispatch(call) {
            Ok(result) => MethodResponse::success(result),
            Err(BatteryError::NotImplemented { method }) => {
                info!(%method, "method not implemented");
                MethodResponse::not_implemented()
            }
            Err(e) => MethodResponse::error(e.code(), e.to_string())
                .with_details(json!({ "source": self.service.source().name() })),
        };

        debug!(
            method = %call.method,
            id = ?call.id,
            success = response.is_success(),
            "handled call"
        );
        response.with_id(call.id)
    }

    /// Handles one JSON request line.
    pub fn handle_line(&self, line: &str) -> MethodResponse {
        match MethodCall::from_json(line) {
            Ok(call) => self.handle(&call),
            Err(e) => {
                warn!(error = %e, "malformed request");
                MethodResponse::error(codes::BAD_REQUEST, e.to_string())
            }
        }
    }
}

pub fn battery_info(snapshot: &BatterySnapshot) -> BatteryInfo {
    BatteryInfo {
        level: snapshot.level.to_wire(),
        is_charging: snapshot.is_charging,
        is_plugged_in: snapshot.is_plugged_in,
    }
}
