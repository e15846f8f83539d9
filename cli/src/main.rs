mod channel;
mod cli;
mod commands;
mod config;
mod logging;
mod source;

use clap::Parser;
use color_eyre::eyre::Result;
use juice_platform::{BatteryQueryService, PowerSource};

use channel::MethodHandler;
use cli::{Cli, Commands};
use config::{LogLevel, UserConfig};
use logging::LogMode;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let mut config = UserConfig::load();
    config.merge_with_args(cli.source, cli.channel.as_deref());
    let log_level_override = cli.log_level.as_deref().map(LogLevel::from_str);

    // serve owns stdout for responses
    let mode = match &cli.command {
        Commands::Serve { socket } => LogMode::File {
            prefix: logging::serve_log_prefix(socket.as_deref()),
        },
        _ => LogMode::Stderr,
    };
    let _guard = logging::init(config.log_level, mode, log_level_override);

    let simulate = cli.simulate.as_deref();
    let handler = || build_handler(&config, simulate);

    match cli.command {
        Commands::Level => commands::query::level(&handler()?),
        Commands::Info { compact } => commands::query::info(&handler()?, compact),
        Commands::Call { method, args } => {
            commands::call::run(&handler()?, &method, args.as_deref())
        }
        Commands::Serve { socket } => Ok(commands::serve::run(handler()?, socket)?),
        Commands::Debug => commands::debug::run(&handler()?),
        Commands::Config { path, reset } => commands::config::run(path, reset),
    }
}

fn build_handler(
    config: &UserConfig,
    simulate: Option<&str>,
) -> Result<MethodHandler<Box<dyn PowerSource>>> {
    let source = source::build(config.source, simulate)?;
    let service = BatteryQueryService::with_policy(source, config.monitoring);
    Ok(MethodHandler::new(service, config.channel.clone()))
}
