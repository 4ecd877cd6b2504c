use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use agentscout::app::AppContext;
use agentscout::cli::{commands, Cli, Commands};
use agentscout::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Platforms => {
            commands::list_platforms()?;
        }
        Commands::InitConfig { force } => {
            commands::init_config(cli.config.as_deref(), force)?;
        }
        Commands::Run(args) => {
            let mut config = Config::load(cli.config.as_deref())?;
            args.apply(&mut config);
            config.validate()?;

            // RUST_LOG wins over the configured level
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str())),
                )
                .init();

            let ctx = AppContext::new(config);
            commands::run(&ctx).await?;
        }
    }

    Ok(())
}
