use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use elemnote::application::ports::{LlmClient, SpeechSynthesizer};
use elemnote::application::services::{PromptComposer, StudyPipeline};
use elemnote::domain::STUDY_TUTOR_PERSONA;
use elemnote::infrastructure::llm::{LlmClientFactory, MockLlmClient};
use elemnote::infrastructure::observability::{LOG_FORMAT_VAR, TracingConfig, init_tracing};
use elemnote::infrastructure::speech::{MockSpeechSynthesizer, SpeechSynthesizerFactory};
use elemnote::infrastructure::storage::LocalStagingStore;
use elemnote::infrastructure::text_processing::CompositeFileLoader;
use elemnote::presentation::{AppState, Environment, ScaffoldConfig, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env()?;

    let settings = Settings::load(environment).context("Failed to load settings")?;

    let tracing_config = TracingConfig::new(
        environment.to_string(),
        settings.logging.level.clone(),
        settings.logging.json || environment.is_production(),
    )
    .with_format_override(std::env::var(LOG_FORMAT_VAR).ok().as_deref());
    init_tracing(&tracing_config).context("Failed to initialize tracing")?;

    let scaffold = ScaffoldConfig::from_env();

    if scaffold.enabled {
        tracing::warn!("Scaffold mode enabled, using canned model and speech clients");
    }

    let llm_client: Arc<dyn LlmClient> = if scaffold.enabled {
        Arc::new(MockLlmClient)
    } else {
        LlmClientFactory::create(settings.llm.client_config())?
    };

    let speech_synthesizer: Arc<dyn SpeechSynthesizer> = if scaffold.enabled {
        Arc::new(MockSpeechSynthesizer)
    } else {
        SpeechSynthesizerFactory::create(settings.speech.synthesizer_config())?
    };

    let staging_store = Arc::new(
        LocalStagingStore::new(PathBuf::from(&settings.storage.local_path))
            .context("Failed to open upload staging directory")?,
    );
    tracing::info!(path = %staging_store.base_path().display(), "Staging uploads locally");
    staging_store
        .purge_leftovers()
        .await
        .context("Failed to clear leftover uploads")?;

    let pipeline = Arc::new(StudyPipeline::new(
        Arc::new(CompositeFileLoader::default()),
        llm_client,
        speech_synthesizer,
        staging_store,
        PromptComposer::new(STUDY_TUTOR_PERSONA, settings.pipeline.max_document_chars),
        settings.pipeline.on_synthesis_failure.into(),
    ));

    let router = create_router(AppState {
        pipeline,
        max_upload_bytes: settings.server.max_upload_bytes(),
    });

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!(%addr, environment = %environment, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
