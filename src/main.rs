use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use agri_assistant::application::errors::AssistantError;
use agri_assistant::infrastructure::adapters::console::ConsoleAdapter;
use agri_assistant::infrastructure::adapters::http::{self, AppState};
use agri_assistant::infrastructure::bootstrap::build_services;
use agri_assistant::infrastructure::config::Config;

#[derive(Parser)]
#[command(name = "agri-assistant")]
#[command(about = "Agriculture chatbot backed by hosted AI models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Ask a single question
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
        /// Also synthesize the answer to an MP3
        #[arg(long)]
        voice: bool,
    },
    /// Interactive chat in the terminal
    Chat,
    /// Transcribe an audio file
    Transcribe {
        file: PathBuf,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() -> ExitCode {
    // .env is optional
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("agri_assistant=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli.command, config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: &str) -> Config {
    let mut config = if Path::new(path).exists() {
        Config::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        })
    } else {
        tracing::debug!("No config at {}, using defaults", path);
        Config::default()
    };

    config.apply_env(|name| std::env::var(name).ok());
    config
}

async fn run(command: Commands, mut config: Config) -> Result<(), AssistantError> {
    match command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.warn_missing_keys();

            let services = build_services(&config).await?;
            let state = AppState::new(services.chat, services.admin, &config);
            http::serve(state, &config).await
        }
        Commands::Ask { question, voice } => {
            let console = console_adapter(&config).await?;
            let reply = console.ask(&question.join(" "), voice).await;
            println!("{}", reply.text);

            if let Some(url) = reply.voice.filter(|v| !v.is_empty()) {
                let file = url.rsplit('/').next().unwrap_or_default();
                println!("Voice saved to {}", config.storage.audio_dir().join(file).display());
            }
            Ok(())
        }
        Commands::Chat => {
            let console = console_adapter(&config).await?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            console.run(stdin, tokio::io::stdout()).await
        }
        Commands::Transcribe { file } => {
            let console = console_adapter(&config).await?;
            println!("{}", console.transcribe_file(&file).await?);
            Ok(())
        }
        Commands::Version => {
            println!("agri-assistant v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    }
}

async fn console_adapter(config: &Config) -> Result<ConsoleAdapter, AssistantError> {
    config.warn_missing_keys();
    let services = build_services(config).await?;
    Ok(ConsoleAdapter::new(Arc::new(services.chat)))
}

fn init_config() -> Result<(), AssistantError> {
    let config = Config::default();
    println!("{}", config.to_yaml()?);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
