//! Astra application binary - composition root.
//!
//! 1. Parse the command line and load configuration from TOML
//! 2. Install the tracing subscriber
//! 3. Build the Wikipedia clients and the dialogue engine
//! 4. Run the requested command: an interactive chat, a single question, or
//!    writing a default config file

mod cli;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use astra_chat::{
    DeliveryRate, DialogueEngine, LineListener, LogSpeaker, TurnReply, TurnRoute, VoiceInterface,
};
use astra_core::{AstraConfig, AstraError};
use astra_lookup::{HttpSettings, WikipediaSearchClient, WikipediaSummaryClient};
use chrono::{Local, NaiveTime};
use clap::Parser;
use tokio::io::BufReader;

use cli::{CliArgs, Command};

/// Install the fmt subscriber. `RUST_LOG` wins over `directive`.
fn init_tracing(directive: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(directive))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Wire the dialogue engine to the Wikipedia clients.
fn build_engine(config: &AstraConfig) -> Result<DialogueEngine, AstraError> {
    let http = HttpSettings::from_config(&config.lookup)?;
    let encyclopedia =
        WikipediaSummaryClient::with_http(http.clone(), config.lookup.summary_sentences);
    let web = WikipediaSearchClient::with_http(http);
    tracing::info!(base_url = %config.lookup.wikipedia_base_url, "Knowledge sources ready");

    Ok(DialogueEngine::new(
        config,
        Arc::new(encyclopedia),
        Arc::new(web),
    ))
}

/// One transcript line, e.g. `Astra [14:03:09]: Hello!`.
fn transcript_line(speaker: &str, text: &str, at: NaiveTime) -> String {
    format!("{} [{}]: {}", speaker, at.format("%H:%M:%S"), text)
}

fn welcome_message(name: &str) -> String {
    format!("Hello! I am your AI assistant {}. Ask me anything.", name)
}

/// Interactive loop: one turn per utterance until the input closes or a
/// farewell is given.
async fn run_chat<W: Write>(
    engine: &DialogueEngine,
    name: &str,
    voice: &mut VoiceInterface,
    out: &mut W,
) -> std::io::Result<()> {
    let welcome = welcome_message(name);
    writeln!(out, "{}", transcript_line(name, &welcome, Local::now().time()))?;
    voice.speak(&welcome, DeliveryRate::NEUTRAL);

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(message) = voice.listen().await else {
            writeln!(out)?;
            break;
        };
        let message = message.trim();
        if message.is_empty() {
            continue;
        }
        writeln!(out, "{}", transcript_line("You", message, Local::now().time()))?;

        let reply = engine.handle_turn(message).await;
        if let Some(text) = reply.text.as_deref() {
            writeln!(out, "{}\n", transcript_line(name, text, Local::now().time()))?;
        }
        voice.speak_reply(&reply);
        if reply.route == TurnRoute::Farewell {
            break;
        }
    }

    tracing::info!(
        conversation = %engine.context().id(),
        answered = engine.context().answered_count(),
        "Conversation ended"
    );
    Ok(())
}

/// Print a single reply as plain text or JSON.
fn print_reply<W: Write>(reply: &TurnReply, json: bool, out: &mut W) -> Result<(), AstraError> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(reply)?)?;
    } else if let Some(text) = reply.text.as_deref() {
        writeln!(out, "{}", text)?;
    }
    Ok(())
}

/// Write the default configuration to `path`.
fn init_config(path: &Path, force: bool) -> Result<(), AstraError> {
    if path.exists() && !force {
        return Err(AstraError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    AstraConfig::default().save(path)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing starts so its log level can apply.
    let config_file = args.resolve_config_path();
    let (config, load_error) = if config_file.exists() {
        match AstraConfig::load(&config_file) {
            Ok(config) => (config, None),
            Err(e) => (AstraConfig::default(), Some(e)),
        }
    } else {
        (AstraConfig::default(), None)
    };

    init_tracing(&args.resolve_log_level(&config.general.log_level));
    tracing::info!("Starting Astra v{}", env!("CARGO_PKG_VERSION"));
    match load_error {
        Some(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config, using defaults"
        ),
        None => tracing::debug!(path = %config_file.display(), "Configuration resolved"),
    }

    match args.command() {
        Command::Init { force } => {
            init_config(&config_file, force)?;
            println!("Wrote {}", config_file.display());
        }
        Command::Ask { question, json } => {
            let engine = build_engine(&config)?;
            let reply = engine.handle_turn(&question.join(" ")).await;
            print_reply(&reply, json, &mut std::io::stdout())?;
        }
        Command::Chat { speak } => {
            let engine = build_engine(&config)?;
            let stdin = LineListener::new(BufReader::new(tokio::io::stdin()));
            let mut voice =
                VoiceInterface::new(Box::new(stdin), DeliveryRate::new(config.voice.base_rate));
            if speak || config.voice.enabled {
                voice = voice.with_speaker(Box::new(LogSpeaker::new()));
            }
            run_chat(
                &engine,
                &config.general.assistant_name,
                &mut voice,
                &mut std::io::stdout(),
            )
            .await?;
        }
    }

    Ok(())
}
