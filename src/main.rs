use clap::{Parser, Subcommand};

use roll_relay::application::errors::RelayError;
use roll_relay::infrastructure::config::Config;
use roll_relay::infrastructure::server;

#[derive(Parser)]
#[command(name = "roll-relay")]
#[command(about = "A real-time chat relay with dice-rolling chat-ops", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Listen address (overrides config)
    #[arg(short, long)]
    bind: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the relay
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_relay(&cli.config, cli.bind),
        Commands::Version => {
            println!("roll-relay v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(config_path: &str) -> Config {
    if !std::path::Path::new(config_path).exists() {
        return Config::load_env();
    }

    match Config::load(config_path) {
        Ok(mut config) => {
            config.apply_env();
            config
        }
        Err(e) => {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        }
    }
}

fn run_relay(config_path: &str, bind_override: Option<String>) -> Result<(), RelayError> {
    let mut config = load_config(config_path);
    if let Some(bind) = bind_override {
        config.server.bind = bind;
    }
    config.validate()?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(server::run(config))
}

fn init_config() -> Result<(), RelayError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
