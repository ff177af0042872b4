use anyhow::{Context, Result};
use chatpane::config::ChatConfig;
use chatpane::speech::SpeechProvider;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatpane=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Chatpane");

    let explicit = std::env::args_os().nth(1).map(PathBuf::from);
    let config = ChatConfig::load(explicit.as_deref()).context("failed to load configuration")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .thread_name("chatpane-timers")
        .build()
        .context("failed to start the timer runtime")?;

    let provider = speech_provider(&config);

    chatpane::ui::run(config, runtime.handle().clone(), provider)
        .map_err(|e| anyhow::anyhow!("window error: {}", e))?;

    info!("Chatpane shutting down");
    Ok(())
}

#[cfg(feature = "audio-io")]
fn speech_provider(config: &ChatConfig) -> Box<dyn SpeechProvider> {
    Box::new(chatpane::speech::WhisperSpeechProvider::new(
        config.speech.clone(),
    ))
}

#[cfg(not(feature = "audio-io"))]
fn speech_provider(_config: &ChatConfig) -> Box<dyn SpeechProvider> {
    info!("Built without audio-io, dictation is unavailable");
    Box::new(chatpane::speech::UnsupportedSpeech)
}
