//! Session orchestration: capture lifecycle, the live recognition listener,
//! clip processing, and the transcript.
//!
//! The service owns one optional recorder at a time. Clip processing runs on
//! spawned tasks so capture never waits on the network; a session epoch
//! stamps every task, and results whose epoch has moved on are dropped
//! instead of leaking into a newer session's transcript.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use wingman_capture::{
    CaptureBackend, CaptureError, ChunkedRecorder, RecorderConfig, RecorderState, RequestGate,
    select_source,
};
use wingman_core::{
    AudioClip, CaptureSource, NO_API_KEY_NOTICE, SessionSettings, SpeakerClassifier, SpeakerRole,
    SuggestionText, TranscriptEntry, TranscriptLog, TranscriptOrigin, classify_speaker, markup,
    worth_processing,
};
use wingman_engine::traits::SpeechRecognizer;
use wingman_runtime::assemble::build_engine_from_settings;
use wingman_runtime::settings_store::SettingsStore;

const STATUS_READY: &str = "Pronto para iniciar";
const STATUS_RECORDING: &str = "Gravando...";
const STATUS_PAUSED: &str = "Gravação pausada";

/// What the UI layer hears from a running session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Status(String),
    Stage(String),
    Entry {
        entry: TranscriptEntry,
        display: String,
    },
    Suggestion(SuggestionText),
    Notice(String),
}

/// Maps capture failures to short, actionable user-facing text.
/// Details stay in the logs.
pub fn user_facing_capture_error(e: &CaptureError) -> String {
    match e {
        CaptureError::NoSourceAvailable => {
            "Nenhuma fonte de captura encontrada. Compartilhe uma tela e tente novamente."
        }
        CaptureError::PermissionDenied(_) => {
            "Permissão de captura negada. Libere o acesso à tela nas configurações do sistema."
        }
        CaptureError::RequestThrottled { .. } => {
            "Aguarde alguns segundos antes de solicitar a captura novamente."
        }
        CaptureError::AlreadyRecording => "A gravação já está em andamento.",
        CaptureError::NotRecording => "Nenhuma gravação em andamento.",
        CaptureError::InvalidClip { .. } => "Áudio capturado insuficiente para transcrição.",
        CaptureError::Backend(_) => "Falha na captura de áudio. Consulte os logs para detalhes.",
    }
    .into()
}

#[derive(Clone)]
pub struct InterviewService {
    settings_store: SettingsStore,
    backend: Arc<dyn CaptureBackend>,
    recognizer: Arc<dyn SpeechRecognizer>,
    classifier: SpeakerClassifier,
    recorder: Arc<tokio::sync::Mutex<Option<ChunkedRecorder>>>,
    recorder_config: RecorderConfig,
    listener: Arc<Mutex<Option<JoinHandle<()>>>>,
    transcript: Arc<Mutex<TranscriptLog>>,
    status: Arc<Mutex<String>>,
    epoch: Arc<AtomicU64>,
    gate: Arc<Mutex<RequestGate>>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl InterviewService {
    pub fn new(
        settings_path: PathBuf,
        backend: Arc<dyn CaptureBackend>,
        recognizer: Arc<dyn SpeechRecognizer>,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let service = Self {
            settings_store: SettingsStore::at_path(settings_path),
            backend,
            recognizer,
            classifier: classify_speaker,
            recorder: Arc::new(tokio::sync::Mutex::new(None)),
            recorder_config: RecorderConfig::default(),
            listener: Arc::new(Mutex::new(None)),
            transcript: Arc::new(Mutex::new(TranscriptLog::new())),
            status: Arc::new(Mutex::new(STATUS_READY.to_string())),
            epoch: Arc::new(AtomicU64::new(0)),
            gate: Arc::new(Mutex::new(RequestGate::default())),
            events,
        };
        (service, receiver)
    }

    pub fn with_recorder_config(mut self, config: RecorderConfig) -> Self {
        self.recorder_config = config;
        self
    }

    /// Replaces the policy that decides who said a recognized utterance.
    pub fn with_classifier(mut self, classifier: SpeakerClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_request_cooldown(self, cooldown: Duration) -> Self {
        *lock(&self.gate) = RequestGate::new(cooldown);
        self
    }

    /// Picks a source, opens its loopback and starts recording. Returns the
    /// selected source so the UI can show what is being captured. Also turns
    /// on the live recognition listener when the host has a recognizer.
    pub async fn start_session(&self) -> Result<CaptureSource, CaptureError> {
        let mut recorder = self.recorder.lock().await;
        if recorder
            .as_ref()
            .is_some_and(|r| r.state() != RecorderState::Idle)
        {
            return Err(CaptureError::AlreadyRecording);
        }
        lock(&self.gate).try_acquire()?;

        let sources = self.backend.list_sources().await?;
        let source = select_source(&sources)?;
        let stream = self.backend.open_stream(&source).await?;
        let mut fresh = ChunkedRecorder::new(stream, self.recorder_config);
        fresh.start()?;
        log::info!(
            "recording from \"{}\" as {}",
            source.name,
            fresh.media_type()
        );
        *recorder = Some(fresh);
        drop(recorder);

        let epoch_at = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_status(STATUS_RECORDING);

        let settings = self.settings_store.load_or_default();
        self.spawn_live_listener(&settings, epoch_at);
        Ok(source)
    }

    /// Suspends capture without ending the session.
    pub async fn pause_session(&self) -> Result<(), CaptureError> {
        let mut recorder = self.recorder.lock().await;
        let r = recorder.as_mut().ok_or(CaptureError::NotRecording)?;
        r.pause().await?;
        drop(recorder);
        self.set_status(STATUS_PAUSED);
        Ok(())
    }

    pub async fn resume_session(&self) -> Result<(), CaptureError> {
        let mut recorder = self.recorder.lock().await;
        let r = recorder.as_mut().ok_or(CaptureError::NotRecording)?;
        r.resume()?;
        drop(recorder);
        self.set_status(STATUS_RECORDING);
        Ok(())
    }

    /// Pushes whatever is buffered into the pipeline without stopping.
    /// Returns whether a clip was actually emitted.
    pub async fn flush_now(&self) -> Result<bool, CaptureError> {
        let mut recorder = self.recorder.lock().await;
        let r = recorder.as_mut().ok_or(CaptureError::NotRecording)?;
        let clip = r.request_flush().await?;
        drop(recorder);

        match clip {
            Some(clip) => {
                self.spawn_clip_processing(clip, self.epoch.load(Ordering::SeqCst));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Ends the session: cancels the live listener and sends the final clip
    /// through the pipeline. The clip's results may land after this returns;
    /// that is the normal shape of a stop, not staleness.
    pub async fn stop_session(&self) -> Result<(), CaptureError> {
        let mut slot = self.recorder.lock().await;
        let mut recorder = slot.take().ok_or(CaptureError::NotRecording)?;
        drop(slot);

        let outcome = recorder.stop().await;
        if let Some(listener) = lock(&self.listener).take() {
            listener.abort();
        }
        self.set_status(STATUS_READY);
        match outcome? {
            Some(clip) => {
                log::info!("final clip: {} bytes of {}", clip.len(), clip.media_type);
                self.spawn_clip_processing(clip, self.epoch.load(Ordering::SeqCst));
                Ok(())
            }
            None => Ok(()),
        }
    }

    pub fn status_text(&self) -> String {
        lock(&self.status).clone()
    }

    pub async fn is_recording(&self) -> bool {
        self.recorder
            .lock()
            .await
            .as_ref()
            .is_some_and(|r| r.state() == RecorderState::Recording)
    }

    pub fn transcript_entries(&self) -> Vec<TranscriptEntry> {
        lock(&self.transcript).entries().to_vec()
    }

    pub fn transcript_dialogue(&self) -> String {
        lock(&self.transcript).as_dialogue()
    }

    pub fn load_settings(&self) -> SessionSettings {
        self.settings_store.load_or_default()
    }

    pub fn save_settings(&self, settings: &SessionSettings) -> anyhow::Result<()> {
        self.settings_store.save(settings)
    }

    fn set_status(&self, status: &str) {
        *lock(&self.status) = status.to_string();
        let _ = self.events.send(SessionEvent::Status(status.to_string()));
    }

    /// Runs one clip through transcribe -> suggest off the capture path.
    /// The engine is rebuilt from the freshest settings every time, so a
    /// key or model change applies to the very next clip.
    fn spawn_clip_processing(&self, clip: AudioClip, epoch_at: u64) {
        let service = self.clone();
        tokio::spawn(async move {
            let settings = service.settings_store.load_or_default();
            let engine = build_engine_from_settings(&settings, service.recognizer.clone());
            let events = service.events.clone();

            let result = engine
                .process_clip_with_hook(&clip, &settings, |stage| {
                    let events = events.clone();
                    async move {
                        let _ = events.send(SessionEvent::Stage(stage.to_string()));
                    }
                })
                .await;

            service.record_entry(result.entry, result.entry_display, epoch_at);
            match result.suggestion {
                Some(suggestion) => service.record_suggestion(suggestion, epoch_at),
                None => {
                    if let Some(error) = result.error {
                        log::warn!("exchange finished without a draft: {error}");
                        service.record_notice(NO_API_KEY_NOTICE, epoch_at);
                    }
                }
            }
        });
    }

    /// Feeds continuous recognition into the transcript: questions get a
    /// drafted answer, everything else is logged as the candidate speaking.
    fn spawn_live_listener(&self, settings: &SessionSettings, epoch_at: u64) {
        if !self.recognizer.is_available() {
            return;
        }
        let mut utterances = match self.recognizer.start_continuous(&settings.language) {
            Ok(rx) => rx,
            Err(err) => {
                log::warn!("continuous recognition unavailable: {err:#}");
                return;
            }
        };

        let service = self.clone();
        let handle = tokio::spawn(async move {
            let mut last_processed: Option<String> = None;
            while let Some(utterance) = utterances.recv().await {
                if service.epoch.load(Ordering::SeqCst) != epoch_at {
                    break;
                }
                if !utterance.is_final {
                    continue;
                }
                let text = utterance.text.trim().to_string();
                if !worth_processing(&text, last_processed.as_deref()) {
                    continue;
                }
                last_processed = Some(text.clone());
                service.handle_live_utterance(&text, epoch_at).await;
            }
        });
        if let Some(previous) = lock(&self.listener).replace(handle) {
            previous.abort();
        }
    }

    async fn handle_live_utterance(&self, text: &str, epoch_at: u64) {
        match (self.classifier)(text) {
            SpeakerRole::Interviewer => {
                let entry =
                    TranscriptEntry::new(SpeakerRole::Interviewer, text, TranscriptOrigin::OnDevice);
                let display = markup::format(text);
                self.record_entry(entry, display, epoch_at);

                let settings = self.settings_store.load_or_default();
                let engine = build_engine_from_settings(&settings, self.recognizer.clone());
                match engine.suggest_for_question(text, &settings).await {
                    Ok(suggestion) => self.record_suggestion(suggestion, epoch_at),
                    Err(err) => {
                        log::warn!("drafting for a live question failed: {err}");
                        self.record_notice(NO_API_KEY_NOTICE, epoch_at);
                    }
                }
            }
            SpeakerRole::Candidate => {
                let entry =
                    TranscriptEntry::new(SpeakerRole::Candidate, text, TranscriptOrigin::OnDevice);
                let display = markup::format(text);
                self.record_entry(entry, display, epoch_at);
            }
        }
    }

    fn record_entry(&self, entry: TranscriptEntry, display: String, epoch_at: u64) {
        if self.epoch.load(Ordering::SeqCst) != epoch_at {
            log::debug!("discarding a transcript entry from a previous session");
            return;
        }
        lock(&self.transcript).append(entry.clone());
        let _ = self.events.send(SessionEvent::Entry { entry, display });
    }

    fn record_suggestion(&self, suggestion: SuggestionText, epoch_at: u64) {
        if self.epoch.load(Ordering::SeqCst) != epoch_at {
            log::debug!("discarding a suggestion from a previous session");
            return;
        }
        let entry = TranscriptEntry::new(
            SpeakerRole::Candidate,
            &suggestion.raw,
            TranscriptOrigin::Suggestion,
        );
        lock(&self.transcript).append(entry);
        let _ = self.events.send(SessionEvent::Suggestion(suggestion));
    }

    fn record_notice(&self, notice: &str, epoch_at: u64) {
        if self.epoch.load(Ordering::SeqCst) != epoch_at {
            return;
        }
        let entry =
            TranscriptEntry::new(SpeakerRole::Candidate, notice, TranscriptOrigin::Notice);
        lock(&self.transcript).append(entry);
        let _ = self.events.send(SessionEvent::Notice(notice.to_string()));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
