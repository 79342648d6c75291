//! Capture source discovery and selection.
//!
//! A capture session starts from a [`CaptureSource`] picked out of whatever
//! the host backend enumerates. Interview audio comes through the system
//! loopback of a shared screen, so selection prefers a full-screen source and
//! only falls back to the first entry when nothing looks like one.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;
use wingman_core::{AudioChunk, CaptureSource};

/// Errors surfaced by the capture layer.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no capture source available")]
    NoSourceAvailable,

    #[error("capture permission denied: {0}")]
    PermissionDenied(String),

    #[error("capture request throttled, retry in {retry_after_ms} ms")]
    RequestThrottled { retry_after_ms: u64 },

    #[error("a recording is already active")]
    AlreadyRecording,

    #[error("no recording is active")]
    NotRecording,

    #[error("captured clip is too small to be audio ({len} bytes)")]
    InvalidClip { len: usize },

    #[error("capture backend failure: {0}")]
    Backend(String),
}

/// Source names that identify a full-screen share across the locales we see
/// in practice.
const FULL_SCREEN_NAMES: &[&str] = &["Tela inteira", "Entire screen", "Screen 1"];

/// Container types we ask the backend for, most preferred first. Opus in WebM
/// is what the transcription endpoint handles best; the rest are fallbacks
/// for platforms without an Opus encoder.
pub const PREFERRED_MEDIA_TYPES: &[&str] = &[
    "audio/webm;codecs=opus",
    "audio/webm",
    "audio/ogg;codecs=opus",
    "audio/mp4",
];

/// Minimum idle time between capture permission requests. Prompting the OS
/// again while a prompt may still be on screen only stacks dialogs.
pub const REQUEST_COOLDOWN: Duration = Duration::from_secs(5);

/// Picks the source to record from. Full-screen entries win because their
/// loopback carries the whole meeting audio; a named window might only carry
/// its own. Ties go to the first enumerated source.
pub fn select_source(sources: &[CaptureSource]) -> Result<CaptureSource, CaptureError> {
    let preferred = sources.iter().find(|source| {
        FULL_SCREEN_NAMES.contains(&source.name.as_str()) || source.name.contains("screen")
    });
    preferred
        .or_else(|| sources.first())
        .cloned()
        .ok_or(CaptureError::NoSourceAvailable)
}

/// Picks the first container the backend supports, falling back to plain
/// WebM when the probe rejects every preference.
pub fn negotiate_media_type(supported: impl Fn(&str) -> bool) -> &'static str {
    PREFERRED_MEDIA_TYPES
        .iter()
        .copied()
        .find(|candidate| supported(candidate))
        .unwrap_or("audio/webm")
}

/// Host capability for enumerating sources and opening their loopback audio.
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    async fn list_sources(&self) -> Result<Vec<CaptureSource>, CaptureError>;

    /// Opens the loopback stream of `source`. May prompt the user for
    /// permission, which is why callers must pass a [`RequestGate`] check
    /// first.
    async fn open_stream(
        &self,
        source: &CaptureSource,
    ) -> Result<Box<dyn AudioStream>, CaptureError>;
}

/// An open loopback stream delivering encoded audio.
#[async_trait]
pub trait AudioStream: Send + Sync {
    /// Container type negotiated when the stream was opened.
    fn media_type(&self) -> &str;

    /// Drains whatever the encoder buffered since the previous pull. An
    /// empty chunk means nothing new arrived.
    async fn pull_chunk(&mut self) -> Result<AudioChunk, CaptureError>;
}

/// Rate limiter for permission-prompting capture requests. A request inside
/// the cooldown window is rejected immediately rather than queued, so the
/// caller can tell the user to retry instead of silently stalling.
#[derive(Debug)]
pub struct RequestGate {
    cooldown: Duration,
    last_request: Option<Instant>,
}

impl RequestGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_request: None,
        }
    }

    /// Records a request attempt. Fails with [`CaptureError::RequestThrottled`]
    /// when the previous attempt was less than the cooldown ago; the window is
    /// not extended by rejected attempts.
    pub fn try_acquire(&mut self) -> Result<(), CaptureError> {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.cooldown {
                let retry_after = self.cooldown - elapsed;
                return Err(CaptureError::RequestThrottled {
                    retry_after_ms: retry_after.as_millis() as u64,
                });
            }
        }
        self.last_request = Some(Instant::now());
        Ok(())
    }
}

impl Default for RequestGate {
    fn default() -> Self {
        Self::new(REQUEST_COOLDOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wingman_core::SourceKind;

    fn source(id: &str, name: &str) -> CaptureSource {
        CaptureSource::new(id, name, SourceKind::Screen)
    }

    #[test]
    fn selection_prefers_known_full_screen_names() {
        let sources = vec![
            source("1", "Zoom Meeting"),
            source("2", "Entire screen"),
            source("3", "Slack"),
        ];
        assert_eq!(select_source(&sources).unwrap().name, "Entire screen");

        let sources = vec![source("1", "Janela"), source("2", "Tela inteira")];
        assert_eq!(select_source(&sources).unwrap().name, "Tela inteira");
    }

    #[test]
    fn selection_accepts_screen_substring() {
        let sources = vec![
            source("1", "Terminal"),
            source("2", "screen share helper"),
        ];
        assert_eq!(select_source(&sources).unwrap().id.as_str(), "2");
    }

    #[test]
    fn selection_falls_back_to_first_source() {
        let sources = vec![source("1", "Browser"), source("2", "Editor")];
        assert_eq!(select_source(&sources).unwrap().id.as_str(), "1");
    }

    #[test]
    fn selection_with_no_sources_is_an_error() {
        assert!(matches!(
            select_source(&[]),
            Err(CaptureError::NoSourceAvailable)
        ));
    }

    #[test]
    fn negotiation_walks_the_preference_list() {
        let picked = negotiate_media_type(|t| t == "audio/mp4");
        assert_eq!(picked, "audio/mp4");

        let picked = negotiate_media_type(|_| true);
        assert_eq!(picked, "audio/webm;codecs=opus");

        let picked = negotiate_media_type(|_| false);
        assert_eq!(picked, "audio/webm");
    }

    #[test]
    fn gate_rejects_inside_cooldown_and_recovers() {
        let mut gate = RequestGate::new(Duration::from_millis(30));
        gate.try_acquire().unwrap();

        match gate.try_acquire() {
            Err(CaptureError::RequestThrottled { retry_after_ms }) => {
                assert!(retry_after_ms <= 30);
            }
            other => panic!("expected throttle, got {other:?}"),
        }

        std::thread::sleep(Duration::from_millis(40));
        gate.try_acquire().unwrap();
    }
}
