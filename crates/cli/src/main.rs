use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pigeon")]
#[command(about = "Pigeon: Discord bot relaying !ai and !news commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config.json.
    Init {
        /// Config file path (default: PIGEON_CONFIG_PATH or ~/.pigeon/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Run the bot: Discord session plus the HTTP liveness endpoint. This is the default.
    Run {
        /// Config file path (default: PIGEON_CONFIG_PATH or ~/.pigeon/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Liveness HTTP port (default from PORT, config, or 3000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Send one prompt to the inference endpoint and print the reply.
    Ai {
        /// Config file path (default: PIGEON_CONFIG_PATH or ~/.pigeon/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Prompt text
        #[arg(required = true, trailing_var_arg = true)]
        prompt: Vec<String>,
    },

    /// Print the top headlines for a topic (default "latest").
    News {
        /// Config file path (default: PIGEON_CONFIG_PATH or ~/.pigeon/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Topic words
        #[arg(trailing_var_arg = true)]
        topic: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let dotenv = load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match dotenv {
        Ok(path) => log::info!("loaded env from {}", path.display()),
        Err(e) => log::debug!("no .env loaded: {}", e),
    }

    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Run {
        config: None,
        port: None,
    });
    match command {
        Commands::Version => {
            println!("pigeon {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Init { config } => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::Run { config, port } => {
            if let Err(e) = run_bot(config, port).await {
                log::error!("ERROR: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::Ai { config, prompt } => match load(config) {
            Ok(config) => {
                let client = lib::llm::InferenceClient::new(&config.inference);
                println!("{}", client.generate(&prompt.join(" ")).await);
            }
            Err(e) => {
                log::error!("ai failed: {:#}", e);
                std::process::exit(1);
            }
        },
        Commands::News { config, topic } => match load(config) {
            Ok(config) => {
                let client = lib::news::NewsClient::new(&config.news);
                println!("{}", client.headlines(&topic.join(" ")).await);
            }
            Err(e) => {
                log::error!("news failed: {:#}", e);
                std::process::exit(1);
            }
        },
    }
}

/// Load `.env` (or PIGEON_DOTENV_PATH) into the process environment. Runs before the
/// logger is set up so RUST_LOG can come from the file; the caller logs the outcome.
fn load_dotenv() -> Result<PathBuf, dotenvy::Error> {
    match std::env::var("PIGEON_DOTENV_PATH") {
        Ok(path) => dotenvy::from_path(&path).map(|_| PathBuf::from(path)),
        Err(_) => dotenvy::dotenv(),
    }
}

/// Config file (if any) with environment overrides applied.
fn load(config_path: Option<PathBuf>) -> anyhow::Result<lib::config::Config> {
    let (config, path) = lib::config::load_config(config_path)?;
    log::debug!("config path: {}", path.display());
    Ok(lib::config::apply_process_env(config))
}

fn run_init(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(lib::config::default_config_path);
    let dir = lib::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

async fn run_bot(config_path: Option<PathBuf>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = load(config_path)?;
    if let Some(p) = port {
        config.health.port = p;
    }
    lib::gateway::run_gateway(config).await
}
