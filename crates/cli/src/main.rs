use clap::{Parser, Subcommand};
use lib::config;
use lib::responder::Responder;
use lib::weather::{WundergroundClient, ZippopotamClient};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "weatherbot")]
#[command(about = "Zip code weather bot for Watson Workspace", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Serve the webhook (GET / liveness, POST /webhook). Credentials come from the config file or WEATHERBOT_* env.
    Serve {
        /// Config file path (default: WEATHERBOT_CONFIG_PATH or ~/.weatherbot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// HTTP port (default from PORT env, config, or 3000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Look up a zip code once and print the reply the bot would post. Needs only the weather key.
    Conditions {
        /// Five-digit US zip code
        zip: String,

        /// Config file path (default: WEATHERBOT_CONFIG_PATH or ~/.weatherbot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Print the body and X-OUTBOUND-TOKEN the server would return for a verification challenge.
    Sign {
        /// Challenge string sent by the platform
        challenge: String,

        /// Config file path (default: WEATHERBOT_CONFIG_PATH or ~/.weatherbot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("weatherbot {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Serve { config, port }) => {
            if let Err(e) = run_serve(config, port).await {
                log::error!("serve failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Conditions { zip, config }) => {
            if let Err(e) = run_conditions(config, &zip).await {
                log::error!("conditions failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Sign { challenge, config }) => {
            if let Err(e) = run_sign(config, &challenge) {
                log::error!("sign failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

async fn run_serve(config_path: Option<PathBuf>, port: Option<u16>) -> anyhow::Result<()> {
    let (mut config, path) = config::load_config(config_path)?;
    log::debug!("using config {}", path.display());
    config.server.port = port.unwrap_or_else(|| config::resolve_port(&config));
    lib::webhook::run_server(config).await
}

/// Zip and weather lookups only; the reply is printed instead of posted.
async fn run_conditions(config_path: Option<PathBuf>, zip: &str) -> anyhow::Result<()> {
    let (config, _) = config::load_config(config_path)?;
    let key = config::resolve_weather_key(&config)
        .ok_or_else(|| anyhow::anyhow!("weather.apiKey / WEATHERBOT_WEATHER_KEY is not set"))?;
    let responder = Responder::new(
        Arc::new(ZippopotamClient::new(&config.zipcode.base_url)),
        Arc::new(WundergroundClient::new(&config.weather.base_url, &key)),
        Arc::new(StdoutChannel),
    );
    responder.respond("stdout", zip).await?;
    Ok(())
}

fn run_sign(config_path: Option<PathBuf>, challenge: &str) -> anyhow::Result<()> {
    let (config, _) = config::load_config(config_path)?;
    let secret = config::resolve_webhook_secret(&config).ok_or_else(|| {
        anyhow::anyhow!("workspace.webhookSecret / WEATHERBOT_WEBHOOK_SECRET is not set")
    })?;
    let challenge = serde_json::Value::from(challenge);
    let (body, signature) = lib::webhook::verification_response(&secret, Some(&challenge));
    println!("{}", String::from_utf8_lossy(&body));
    println!("{}: {}", lib::webhook::OUTBOUND_TOKEN_HEADER, signature);
    Ok(())
}

/// Reply channel for one-off lookups: prints instead of posting.
struct StdoutChannel;

#[async_trait::async_trait]
impl lib::channels::ReplyChannel for StdoutChannel {
    fn id(&self) -> &str {
        "stdout"
    }

    async fn post_message(
        &self,
        _space_id: &str,
        text: &str,
    ) -> anyhow::Result<()> {
        println!("{}", text);
        Ok(())
    }
}
