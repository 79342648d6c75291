//! Deterministic in-memory capture backend for tests and the demo binary.

use std::collections::VecDeque;

use async_trait::async_trait;
use wingman_core::{AudioChunk, CaptureSource};

use crate::source::{AudioStream, CaptureBackend, CaptureError, negotiate_media_type};

/// Backend that enumerates a fixed source list and replays a scripted chunk
/// feed. Each opened stream gets its own copy of the feed.
pub struct ScriptedBackend {
    sources: Vec<CaptureSource>,
    supported_types: Vec<String>,
    feed: Vec<Vec<u8>>,
    deny_permission: bool,
}

impl ScriptedBackend {
    pub fn new(sources: Vec<CaptureSource>, feed: Vec<Vec<u8>>) -> Self {
        Self {
            sources,
            supported_types: vec!["audio/webm;codecs=opus".into(), "audio/webm".into()],
            feed,
            deny_permission: false,
        }
    }

    /// Restricts which container types the backend claims to support.
    pub fn with_supported_types(mut self, types: &[&str]) -> Self {
        self.supported_types = types.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Makes every `open_stream` fail as if the user refused the prompt.
    pub fn with_permission_denied(mut self) -> Self {
        self.deny_permission = true;
        self
    }
}

#[async_trait]
impl CaptureBackend for ScriptedBackend {
    async fn list_sources(&self) -> Result<Vec<CaptureSource>, CaptureError> {
        Ok(self.sources.clone())
    }

    async fn open_stream(
        &self,
        _source: &CaptureSource,
    ) -> Result<Box<dyn AudioStream>, CaptureError> {
        if self.deny_permission {
            return Err(CaptureError::PermissionDenied(
                "capture request was refused".into(),
            ));
        }
        let media_type =
            negotiate_media_type(|t| self.supported_types.iter().any(|s| s == t));
        Ok(Box::new(ScriptedStream::new(media_type, self.feed.clone())))
    }
}

/// Stream that hands out one scripted chunk per pull and empty chunks once
/// the feed runs dry.
pub struct ScriptedStream {
    media_type: String,
    feed: VecDeque<Vec<u8>>,
}

impl ScriptedStream {
    pub fn new(media_type: impl Into<String>, feed: Vec<Vec<u8>>) -> Self {
        Self {
            media_type: media_type.into(),
            feed: feed.into_iter().collect(),
        }
    }
}

#[async_trait]
impl AudioStream for ScriptedStream {
    fn media_type(&self) -> &str {
        &self.media_type
    }

    async fn pull_chunk(&mut self) -> Result<AudioChunk, CaptureError> {
        Ok(AudioChunk::new(self.feed.pop_front().unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wingman_core::SourceKind;

    fn screen() -> CaptureSource {
        CaptureSource::new("0", "Entire screen", SourceKind::Screen)
    }

    #[tokio::test]
    async fn stream_negotiates_from_the_supported_set() {
        let backend = ScriptedBackend::new(vec![screen()], vec![])
            .with_supported_types(&["audio/mp4"]);
        let stream = backend.open_stream(&screen()).await.unwrap();
        assert_eq!(stream.media_type(), "audio/mp4");
    }

    #[tokio::test]
    async fn stream_replays_the_feed_then_goes_quiet() {
        let backend = ScriptedBackend::new(vec![screen()], vec![vec![1, 2], vec![3]]);
        let mut stream = backend.open_stream(&screen()).await.unwrap();
        assert_eq!(stream.pull_chunk().await.unwrap().bytes, vec![1, 2]);
        assert_eq!(stream.pull_chunk().await.unwrap().bytes, vec![3]);
        assert!(stream.pull_chunk().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn denied_permission_surfaces_as_a_typed_error() {
        let backend = ScriptedBackend::new(vec![screen()], vec![]).with_permission_denied();
        match backend.open_stream(&screen()).await {
            Err(CaptureError::PermissionDenied(_)) => {}
            other => panic!("expected PermissionDenied, got {:?}", other.map(|_| ())),
        }
    }
}
