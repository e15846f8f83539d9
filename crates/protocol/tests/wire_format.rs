use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use juice_protocol::*;

fn to_value(response: &MethodResponse) -> Value {
    serde_json::from_str(&response.to_json().unwrap()).unwrap()
}

#[test]
fn test_full_request_shape() {
    let call = MethodCall::new(GET_BATTERY_INFO)
        .with_id(7)
        .with_channel(DEFAULT_CHANNEL);

    let value: Value = serde_json::from_str(&call.to_json().unwrap()).unwrap();
    assert_eq!(
        value,
        json!({
            "id": 7,
            "channel": "samples.flutter.dev/battery",
            "method": "getBatteryInfo",
            "arguments": null,
        })
    );
}

#[test]
fn test_request_with_arguments() {
    let call = MethodCall::from_json(
        r#"{"id": 3, "method": "getBatteryLevel", "arguments": {"verbose": true}}"#,
    )
    .unwrap();
    assert_eq!(call.id, Some(3));
    assert_eq!(call.arguments, json!({"verbose": true}));
}

#[test]
fn test_request_without_method_rejected() {
    assert!(MethodCall::from_json(r#"{"id": 1}"#).is_err());
    assert!(MethodCall::from_json("getBatteryLevel").is_err());
}

#[test]
fn test_level_success_shape() {
    let response = MethodResponse::success(json!(42)).with_id(Some(1));
    assert_eq!(
        to_value(&response),
        json!({"id": 1, "status": "success", "result": 42})
    );
}

#[test]
fn test_unknown_level_shape() {
    let response = MethodResponse::success(json!(UNKNOWN_LEVEL));
    assert_eq!(to_value(&response), json!({"status": "success", "result": -1}));
}

#[test]
fn test_info_success_shape() {
    let info = BatteryInfo {
        level: 87,
        is_charging: true,
        is_plugged_in: true,
    };
    let response = MethodResponse::success(serde_json::to_value(info).unwrap());
    assert_eq!(
        to_value(&response),
        json!({
            "status": "success",
            "result": {"level": 87, "isCharging": true, "isPluggedIn": true},
        })
    );
}

#[test]
fn test_not_implemented_shape() {
    let response = MethodResponse::not_implemented().with_id(Some(9));
    assert_eq!(to_value(&response), json!({"id": 9, "status": "not_implemented"}));
}

#[test]
fn test_error_shape() {
    let response = MethodResponse::error(codes::UNAVAILABLE, "power subsystem unavailable");
    assert_eq!(
        to_value(&response),
        json!({
            "status": "error",
            "code": "UNAVAILABLE",
            "message": "power subsystem unavailable",
            "details": null,
        })
    );
}

#[test]
fn test_response_parses_back() {
    let line = r#"{"id":4,"status":"error","code":"BAD_REQUEST","message":"expected value"}"#;
    let response = MethodResponse::from_json(line).unwrap();
    assert_eq!(response.id, Some(4));
    assert_eq!(
        response.outcome,
        MethodOutcome::Error {
            code: codes::BAD_REQUEST.to_string(),
            message: "expected value".to_string(),
            details: Value::Null,
        }
    );

    let response = MethodResponse::from_json(r#"{"status":"not_implemented"}"#).unwrap();
    assert_eq!(response.outcome, MethodOutcome::NotImplemented);
    assert!(!response.is_success());
}
