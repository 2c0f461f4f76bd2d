//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here.

use dotenv::dotenv;
use sakura_tutor::adapters::ai::GeminiAdapter;
use sakura_tutor::adapters::speech::{SilentSpeech, SystemSpeech};
use sakura_tutor::adapters::ui::tui::TuiInputPort;
use sakura_tutor::ports::{GenerativePort, InputPort, SpeechPort};
use sakura_tutor::shared::config::AppConfig;
use sakura_tutor::usecases::{AppController, TutorService};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    // Logs go to stderr at `warn` by default so they don't break up the prompts.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    sakura_tutor::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "config load failed, using defaults");
        AppConfig::default()
    });
    if cfg.is_ai_configured() {
        info!("API key is set");
    } else {
        warn!("SAKURA_API_KEY is not set; every tutor request will fail");
    }

    // --- Generative service ---
    info!(model = %cfg.model_or_default(), "using Gemini");
    let ai: Arc<dyn GenerativePort> = Arc::new(GeminiAdapter::new(
        cfg.api_url_or_default(),
        cfg.api_key().unwrap_or_default(),
        cfg.model_or_default(),
    ));

    // --- Speech ---
    let speech: Arc<dyn SpeechPort> = match cfg.tts_command.as_deref().map(str::trim) {
        Some("none" | "off") => {
            info!("speech disabled by config");
            Arc::new(SilentSpeech)
        }
        line => {
            let speech = line
                .and_then(SystemSpeech::from_command_line)
                .unwrap_or_else(SystemSpeech::detect);
            info!(program = speech.program(), "speech command");
            Arc::new(speech)
        }
    };

    // --- Services & UI ---
    let tutor = Arc::new(TutorService::new(ai));
    let app = AppController::new(tutor, speech);
    let tui = TuiInputPort::new(app);

    tui.run().await.map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(())
}
