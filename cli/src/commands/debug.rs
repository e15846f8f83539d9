use color_eyre::eyre::Result;
use juice_platform::{PowerSource, SystemSource};

use crate::channel::{battery_info, MethodHandler};
use crate::config::config_path;
use crate::logging::log_dir;

pub fn run<S: PowerSource>(handler: &MethodHandler<S>) -> Result<()> {
    let service = handler.service();

    println!("juice debug information");
    println!("{}", "=".repeat(60));
    println!("Time: {}", chrono::Utc::now().to_rfc3339());
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("OS: {} ({})", std::env::consts::OS, std::env::consts::ARCH);

    println!("\n--- Channel ---");
    println!("Channel: {}", handler.channel());
    println!("Config: {}", config_path().display());
    println!("Logs: {}", log_dir().display());

    println!("\n--- Source ---");
    println!("Source: {}", service.source().name());
    println!(
        "Requires monitoring: {}",
        service.source().requires_monitoring()
    );
    println!("Monitoring policy: {}", service.policy());
    println!("OS battery detected: {}", SystemSource::is_available());

    println!("\n--- Raw Reading ---");
    match service.read_raw() {
        Ok(reading) => {
            println!("Level: {}", reading.level);
            println!("Status: {}", reading.status);
        }
        Err(e) => println!("Error: {} ({})", e, e.code()),
    }

    println!("\n--- Snapshot ---");
    match service.get_snapshot() {
        Ok(snapshot) => {
            println!("Level: {}", snapshot.level);
            println!("Charging: {}", snapshot.is_charging);
            println!("Plugged in: {}", snapshot.is_plugged_in);
            println!(
                "getBatteryInfo: {}",
                serde_json::to_string(&battery_info(&snapshot))?
            );
        }
        Err(e) => println!("Error: {} ({})", e, e.code()),
    }

    Ok(())
}
