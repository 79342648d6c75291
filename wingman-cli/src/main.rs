use std::sync::Arc;
use std::time::Duration;

use wingman_appcore::{InterviewService, SessionEvent, user_facing_capture_error};
use wingman_capture::{RecorderConfig, ScriptedBackend};
use wingman_core::{CaptureSource, LanguageTag, SourceKind};
use wingman_runtime::recognizer::ScriptedRecognizer;
use wingman_runtime::settings_store::SettingsStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Demo CLI: drives a whole session over scripted capture and recognition.
    // With WINGMAN_API_KEY set, transcription and drafting hit the real API;
    // without it, the pipeline degrades to its offline fallbacks.

    let api_key = std::env::var("WINGMAN_API_KEY").unwrap_or_default();
    let base_url = std::env::var("WINGMAN_BASE_URL")
        .unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let language = std::env::var("WINGMAN_LANGUAGE").unwrap_or_else(|_| "pt-BR".into());

    let settings_path = std::env::temp_dir().join("wingman-demo-settings.json");
    let store = SettingsStore::at_path(&settings_path);
    let mut settings = store.load_or_default();
    settings.api_key = api_key;
    settings.api_base_url = base_url;
    settings.language = LanguageTag::new(language);
    store.save(&settings)?;

    let backend = Arc::new(ScriptedBackend::new(
        vec![
            CaptureSource::new("window-1", "Janela de reunião", SourceKind::Window),
            CaptureSource::new("screen-1", "Entire screen", SourceKind::Screen),
        ],
        vec![vec![0u8; 1200], vec![1u8; 900], vec![2u8; 600]],
    ));
    let recognizer = Arc::new(ScriptedRecognizer::from_lines(&[
        "Me conte sobre um projeto que você liderou.",
        "foi um prazer falar sobre isso",
    ]));

    let (service, mut events) = InterviewService::new(settings_path, backend, recognizer);
    let service = service.with_recorder_config(RecorderConfig {
        chunk_interval: Duration::from_millis(500),
        ..RecorderConfig::default()
    });

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                SessionEvent::Status(status) => println!("status: {status}"),
                SessionEvent::Stage(stage) => println!("stage: {stage}"),
                SessionEvent::Entry { entry, display } => {
                    println!("[{:?} | {:?}] {display}", entry.role, entry.origin);
                }
                SessionEvent::Suggestion(suggestion) => {
                    println!("suggestion ({:?}):\n{}", suggestion.origin, suggestion.display);
                }
                SessionEvent::Notice(notice) => println!("notice: {notice}"),
            }
        }
    });

    let source = match service.start_session().await {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}", user_facing_capture_error(&err));
            return Err(err.into());
        }
    };
    println!("capturando de: {}", source.name);

    // Let the chunk timer and the live listener do a bit of work.
    tokio::time::sleep(Duration::from_millis(1200)).await;

    service.pause_session().await?;
    service.resume_session().await?;

    if service.flush_now().await? {
        println!("clip parcial enviado para transcrição");
    }
    tokio::time::sleep(Duration::from_millis(700)).await;

    service.stop_session().await?;

    // Give in-flight exchanges a moment to land before the report.
    tokio::time::sleep(Duration::from_secs(3)).await;

    println!("--- transcript ---");
    print!("{}", service.transcript_dialogue());

    drop(service);
    let _ = printer.await;
    Ok(())
}
