use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

use replybot::application::errors::BotError;
use replybot::application::messaging::{CentralizedMessageFilter, MessageDispatcher};
use replybot::application::services::{BotRegistry, GuardedDetector};
use replybot::domain::traits::SystemClock;
use replybot::infrastructure::adapters::{parse_line, ConsoleDispatcher};
use replybot::infrastructure::config::{load_bots, Config, LoadReport};
use replybot::infrastructure::identity::MemberDirectory;
use replybot::infrastructure::llm::{LlmDetector, OpenAiCompatibleProvider};
use replybot::plugins::{BlueBot, PluginManager};

const SAMPLE_BOTS: &str = r#"reply-bots:
  - name: hello
    identity:
      type: static
      botName: HelloBot
      avatarUrl: https://example.com/hello.png
    responses: "Hi!"
    triggers:
      - name: greeting
        conditions:
          any_of:
            - contains_word: hello
            - contains_phrase: good morning
"#;

#[derive(Parser)]
#[command(name = "replybot")]
#[command(about = "Rule-driven reply bots with a centralized message filter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot definitions file (overrides config)
    #[arg(short, long)]
    bots: Option<PathBuf>,

    /// Channel id for console input
    #[arg(long, default_value = "console")]
    channel: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Read `author: text` lines from stdin and print replies
    Run,
    /// Check a bot definitions file
    Validate,
    /// Show version
    Version,
    /// Write sample config.yaml and bots.yaml
    InitConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.command {
        Commands::Run | Commands::Validate => Some(load_config(&cli.config, cli.bots.clone())),
        Commands::Version | Commands::InitConfig => None,
    };
    let default_level = match &config {
        Some(Ok(config)) => config.default_log_level(),
        _ => "info",
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    if config.is_some() && !Path::new(&cli.config).exists() {
        tracing::info!("No config at {}, using defaults", cli.config);
    }

    let result = match (cli.command, config) {
        (Commands::Version, _) => {
            println!("replybot v{}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
        (Commands::InitConfig, _) => init_config(),
        (Commands::Run, Some(config)) => config.and_then(|config| run_bot(config, cli.channel)),
        (Commands::Validate, Some(config)) => config.and_then(validate),
        (Commands::Run | Commands::Validate, None) => Err(BotError::Internal("configuration was not loaded".into())),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(config_path: &str, bots_override: Option<PathBuf>) -> Result<Config, BotError> {
    let mut config = if Path::new(config_path).exists() {
        let mut config = Config::load(config_path)?;
        config.apply_env()?;
        config
    } else {
        Config::load_env()?
    };

    if let Some(path) = bots_override {
        config.bots_file = path;
    }
    Ok(config)
}

fn load_definitions(config: &Config) -> Result<LoadReport, BotError> {
    if !config.bots_file.exists() {
        tracing::warn!("Bot definitions file {} not found, no declarative bots loaded", config.bots_file.display());
        return Ok(LoadReport::default());
    }
    Ok(load_bots(&config.bots_file)?)
}

fn run_bot(config: Config, channel: String) -> Result<ExitCode, BotError> {
    let report = load_definitions(&config)?;
    let registry = Arc::new(BotRegistry::with_bots(report.bots));
    let filter = Arc::new(CentralizedMessageFilter::new(config.filter.clone()));

    let mut bluebot = BlueBot::new(config.bluebot.clone(), Arc::new(SystemClock))?;
    if config.llm.is_enabled() {
        let provider = OpenAiCompatibleProvider::from_config(&config.llm)
            .map_err(|e| BotError::Internal(e.to_string()))?;
        let detector = LlmDetector::new(Arc::new(provider))
            .with_temperature(config.llm.temperature)
            .with_max_tokens(config.llm.max_tokens);
        bluebot = bluebot.with_detector(Arc::new(GuardedDetector::with_limits(
            Arc::new(detector),
            config.detection.timeout(),
            config.detection.max_concurrent,
        )));
        tracing::info!("LLM detection enabled ({})", config.llm.model);
    }

    let mut plugins = PluginManager::new();
    plugins.register(bluebot).map_err(BotError::Internal)?;

    let dispatcher = Arc::new(
        MessageDispatcher::new(
            filter,
            registry.clone(),
            Arc::new(MemberDirectory::new()),
            Arc::new(ConsoleDispatcher::new()),
        )
        .with_plugins(plugins),
    );

    tracing::info!(
        "Starting replybot with {} bots and {} plugins",
        registry.len(),
        dispatcher.plugins().list_plugins().len()
    );

    let rt = tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(e.to_string()))?;
    rt.block_on(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut tasks = JoinSet::new();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Failed to read stdin: {}", e);
                    break;
                }
            };

            let Some(msg) = parse_line(&line, &channel) else {
                continue;
            };
            let dispatcher = dispatcher.clone();
            tasks.spawn(async move {
                dispatcher.handle(&msg).await;
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Message task failed: {}", e);
            }
        }
    });

    Ok(ExitCode::SUCCESS)
}

fn validate(config: Config) -> Result<ExitCode, BotError> {
    let report = load_bots(&config.bots_file)?;

    for bot in &report.bots {
        println!(
            "✓ {} ({} identity, {} triggers)",
            bot.name,
            bot.identity.kind(),
            bot.triggers.len()
        );
    }
    for rejected in &report.rejected {
        println!("✗ {}", rejected);
    }
    println!("{} accepted, {} rejected", report.bots.len(), report.rejected.len());

    Ok(if report.is_clean() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn init_config() -> Result<ExitCode, BotError> {
    let config = serde_yaml::to_string(&Config::default())
        .map_err(|e| BotError::Internal(e.to_string()))?;

    for (path, content) in [("config.yaml", config.as_str()), ("bots.yaml", SAMPLE_BOTS)] {
        if Path::new(path).exists() {
            println!("{} already exists, skipping", path);
            continue;
        }
        std::fs::write(path, content).map_err(|e| BotError::Internal(format!("{}: {}", path, e)))?;
        println!("Wrote {}", path);
    }
    Ok(ExitCode::SUCCESS)
}
