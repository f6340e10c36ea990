use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use neurofleet::api::ApiClient;
use neurofleet::cli::{self, Cli, Commands, ConfigCommands, StdinConfirm};
use neurofleet::config::Config;
use neurofleet::session::{FileSessionStore, SessionContext};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // `config check` reports on a broken file instead of failing to load it
    if let Commands::Config(ConfigCommands::Check) = &cli.command {
        init_logging(cli.log_level.as_deref().unwrap_or("warn"));
        return cli::cmd_config_check(&cli.config);
    }

    // Load configuration
    let mut config = Config::load(&cli.config)?;

    // Initialize logging
    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();
    init_logging(&log_level);

    if let Some(api_url) = &cli.api_url {
        config.api.base_url = api_url.clone();
        config.validate()?;
    }

    tracing::debug!(base_url = %config.api.base_url, "Starting NeuroFleetX console v{}", env!("CARGO_PKG_VERSION"));

    let api = ApiClient::new(&config.api)?;
    let store = FileSessionStore::new(config.session.session_file());
    let mut session = SessionContext::new(Box::new(store))?;
    let mut confirm = StdinConfirm::new(cli.yes);

    cli::run_command(&cli, &config, &api, &mut session, &mut confirm).await
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
