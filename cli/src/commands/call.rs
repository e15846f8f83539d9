use color_eyre::eyre::{eyre, Result};
use juice_platform::PowerSource;
use juice_protocol::MethodCall;
use serde_json::Value;

use crate::channel::MethodHandler;

/// Dispatches a single method and prints the wire response.
pub fn run<S: PowerSource>(
    handler: &MethodHandler<S>,
    method: &str,
    args: Option<&str>,
) -> Result<()> {
    let arguments = match args {
        Some(raw) => serde_json::from_str::<Value>(raw)
            .map_err(|e| eyre!("Invalid --args JSON: {}", e))?,
        None => Value::Null,
    };

    let call = MethodCall::new(method)
        .with_channel(handler.channel())
        .with_arguments(arguments);
    let response = handler.handle(&call);

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
