use color_eyre::eyre::Result;
use juice_platform::PowerSource;

use crate::channel::{battery_info, MethodHandler};

/// Prints the level the way `getBatteryLevel` reports it.
pub fn level<S: PowerSource>(handler: &MethodHandler<S>) -> Result<()> {
    let level = handler.service().get_level()?;
    println!("{}", level.to_wire());
    Ok(())
}

/// Prints the `getBatteryInfo` record as JSON.
pub fn info<S: PowerSource>(handler: &MethodHandler<S>, compact: bool) -> Result<()> {
    let snapshot = handler.service().get_snapshot()?;
    let info = battery_info(&snapshot);

    if compact {
        println!("{}", serde_json::to_string(&info)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&info)?);
    }
    Ok(())
}
