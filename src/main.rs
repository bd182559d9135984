use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use daily_journal::adapters::ai::{
    LlmExtractorConfig, LlmRecordExtractor, LlmTaskInterpreter, OpenAIConfig, OpenAIProvider,
};
use daily_journal::adapters::http::{app_router, JournalHandlers};
use daily_journal::adapters::speech::{WhisperConfig, WhisperTranscriber};
use daily_journal::adapters::storage::{FileSessionStore, InMemorySessionStore};
use daily_journal::application::handlers::journal::{
    GetSummaryHandler, HandleMessageHandler, HandleVoiceHandler, JournalSettings,
    SessionRegistry, SetModeHandler, StartNewDayHandler,
};
use daily_journal::config::{AppConfig, StorageBackend};
use daily_journal::domain::foundation::DayKey;
use daily_journal::domain::journal::{JournalRenderer, NotionRenderer};
use daily_journal::ports::{AIProvider, SessionStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let api_key = config.ai.openai_api_key.clone().unwrap_or_default();

    let provider: Arc<dyn AIProvider> = Arc::new(OpenAIProvider::new(
        OpenAIConfig::new(api_key.clone())
            .with_model(config.ai.extraction_model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    )?);

    let transcriber = Arc::new(WhisperTranscriber::new(
        WhisperConfig::new(api_key)
            .with_model(config.ai.transcription_model.clone())
            .with_language(config.ai.transcription_language.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    )?);

    let extractor = Arc::new(LlmRecordExtractor::with_config(
        provider.clone(),
        LlmExtractorConfig {
            temperature: config.ai.temperature,
            ..Default::default()
        },
    ));
    let task_interpreter = Arc::new(LlmTaskInterpreter::new(provider, config.ai.temperature));

    let store: Arc<dyn SessionStore> = match (config.storage.backend, &config.storage.path) {
        (StorageBackend::File, Some(path)) => Arc::new(FileSessionStore::new(path)),
        _ => Arc::new(InMemorySessionStore::new()),
    };
    let registry = Arc::new(SessionRegistry::new(store));
    let renderer: Arc<dyn JournalRenderer> = Arc::new(NotionRenderer);
    let settings = JournalSettings::from(&config.journal);

    let message_handler = Arc::new(HandleMessageHandler::new(
        registry.clone(),
        extractor,
        task_interpreter,
        renderer.clone(),
        settings.clone(),
    ));
    let handlers = JournalHandlers::new(
        message_handler.clone(),
        Arc::new(HandleVoiceHandler::new(transcriber, message_handler)),
        Arc::new(StartNewDayHandler::new(registry.clone())),
        Arc::new(GetSummaryHandler::new(
            registry.clone(),
            renderer,
            settings.render_max_chars,
        )),
        Arc::new(SetModeHandler::new(registry.clone())),
    );

    spawn_session_sweeper(registry, config.journal.sweep_interval());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        storage = ?config.storage.backend,
        "daily journal listening"
    );

    axum::serve(
        listener,
        app_router(handlers, std::time::Duration::from_secs(config.server.request_timeout_secs)),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

/// Periodically drops sessions left over from previous days.
fn spawn_session_sweeper(registry: Arc<SessionRegistry>, every: std::time::Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            registry.evict_stale(DayKey::today()).await;
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
