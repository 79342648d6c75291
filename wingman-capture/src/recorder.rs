//! Timer-driven chunked recording over an open loopback stream.
//!
//! The recorder pulls the stream on a fixed cadence and buffers the encoded
//! chunks. A flush drains the buffer into an [`AudioClip`] without stopping
//! the session; stop performs one last pull and drains whatever remains.
//! Chunks always concatenate in capture order, so a clip's bytes are exactly
//! the stream bytes between two flush boundaries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use wingman_core::{AudioChunk, AudioClip};

use crate::source::{AudioStream, CaptureError};

/// Cadence of the background chunk timer.
pub const CHUNK_INTERVAL: Duration = Duration::from_secs(3);

/// Clips below this size are container headers with no audible payload.
/// Sending them to transcription wastes a round trip.
pub const MIN_CLIP_BYTES: usize = 100;

#[derive(Debug, Clone, Copy)]
pub struct RecorderConfig {
    pub chunk_interval: Duration,
    pub min_clip_bytes: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            chunk_interval: CHUNK_INTERVAL,
            min_clip_bytes: MIN_CLIP_BYTES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
    Paused,
}

/// Buffers chunks from an [`AudioStream`] and assembles them into clips.
///
/// Must live on a tokio runtime; the chunk timer is a spawned task. All
/// transitions run on the caller's side, so the state machine is plain data:
/// `Idle -> Recording -> (Paused <-> Recording) -> Idle`.
pub struct ChunkedRecorder {
    config: RecorderConfig,
    media_type: String,
    stream: Arc<tokio::sync::Mutex<Box<dyn AudioStream>>>,
    chunks: Arc<Mutex<Vec<AudioChunk>>>,
    flushing: Arc<AtomicBool>,
    state: RecorderState,
    timer: Option<JoinHandle<()>>,
}

impl ChunkedRecorder {
    pub fn new(stream: Box<dyn AudioStream>, config: RecorderConfig) -> Self {
        let media_type = stream.media_type().to_string();
        Self {
            config,
            media_type,
            stream: Arc::new(tokio::sync::Mutex::new(stream)),
            chunks: Arc::new(Mutex::new(Vec::new())),
            flushing: Arc::new(AtomicBool::new(false)),
            state: RecorderState::Idle,
            timer: None,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Container type of the clips this recorder produces.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// True while a chunk pull or drain is in flight.
    pub fn is_flushing(&self) -> bool {
        self.flushing.load(Ordering::SeqCst)
    }

    pub fn buffered_chunks(&self) -> usize {
        lock_buffer(&self.chunks).len()
    }

    /// Begins a fresh recording. Fails with [`CaptureError::AlreadyRecording`]
    /// while a recording is active or paused, leaving the existing buffer
    /// untouched.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.state != RecorderState::Idle {
            return Err(CaptureError::AlreadyRecording);
        }
        lock_buffer(&self.chunks).clear();
        self.timer = Some(self.spawn_timer());
        self.state = RecorderState::Recording;
        Ok(())
    }

    /// Suspends the chunk timer. Buffered chunks are kept and join the next
    /// clip. Pausing an already paused recorder is a no-op.
    pub async fn pause(&mut self) -> Result<(), CaptureError> {
        match self.state {
            RecorderState::Recording => {
                self.cancel_timer().await;
                self.state = RecorderState::Paused;
                Ok(())
            }
            RecorderState::Paused => Ok(()),
            RecorderState::Idle => Err(CaptureError::NotRecording),
        }
    }

    /// Restarts the chunk timer after a pause.
    pub fn resume(&mut self) -> Result<(), CaptureError> {
        match self.state {
            RecorderState::Paused => {
                self.timer = Some(self.spawn_timer());
                self.state = RecorderState::Recording;
                Ok(())
            }
            RecorderState::Recording => Ok(()),
            RecorderState::Idle => Err(CaptureError::NotRecording),
        }
    }

    /// Drains the buffer into a clip without stopping the recording. Pulls
    /// the stream once first so the clip includes audio captured since the
    /// last timer tick. Returns `None` when there is not enough buffered data
    /// for a plausible clip; the buffer is left intact for the next boundary.
    pub async fn request_flush(&mut self) -> Result<Option<AudioClip>, CaptureError> {
        if self.state == RecorderState::Idle {
            return Err(CaptureError::NotRecording);
        }
        self.flushing.store(true, Ordering::SeqCst);
        self.pull_once().await;
        let clip = {
            let mut buffer = lock_buffer(&self.chunks);
            let total: usize = buffer.iter().map(AudioChunk::len).sum();
            if total < self.config.min_clip_bytes {
                None
            } else {
                let drained = std::mem::take(&mut *buffer);
                Some(AudioClip::from_chunks(&self.media_type, &drained))
            }
        };
        self.flushing.store(false, Ordering::SeqCst);
        Ok(clip)
    }

    /// Ends the recording and assembles the final clip. The timer is
    /// cancelled before the buffer is read, so a late tick can never append
    /// to a clip that is already being assembled. Returns `Ok(None)` when
    /// nothing was buffered at all, and [`CaptureError::InvalidClip`] when
    /// the remainder is too small to be audio. Either way the recorder ends
    /// up idle with an empty buffer.
    pub async fn stop(&mut self) -> Result<Option<AudioClip>, CaptureError> {
        if self.state == RecorderState::Idle {
            return Err(CaptureError::NotRecording);
        }
        self.cancel_timer().await;
        self.flushing.store(true, Ordering::SeqCst);
        self.pull_once().await;
        self.state = RecorderState::Idle;

        let drained = std::mem::take(&mut *lock_buffer(&self.chunks));
        self.flushing.store(false, Ordering::SeqCst);
        if drained.is_empty() {
            return Ok(None);
        }
        let clip = AudioClip::from_chunks(&self.media_type, &drained);
        if clip.len() < self.config.min_clip_bytes {
            return Err(CaptureError::InvalidClip { len: clip.len() });
        }
        Ok(Some(clip))
    }

    /// One manual stream pull, buffering the chunk if it carries data.
    async fn pull_once(&self) {
        match self.stream.lock().await.pull_chunk().await {
            Ok(chunk) if !chunk.is_empty() => lock_buffer(&self.chunks).push(chunk),
            Ok(_) => {}
            Err(err) => log::warn!("chunk pull failed: {err}"),
        }
    }

    /// Aborts the timer task and waits for it to finish, guaranteeing no
    /// concurrent buffer writes after this returns.
    async fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            let _ = timer.await;
        }
    }

    fn spawn_timer(&self) -> JoinHandle<()> {
        let stream = Arc::clone(&self.stream);
        let chunks = Arc::clone(&self.chunks);
        let flushing = Arc::clone(&self.flushing);
        let period = self.config.chunk_interval;
        tokio::spawn(async move {
            let first = tokio::time::Instant::now() + period;
            let mut ticks = tokio::time::interval_at(first, period);
            loop {
                ticks.tick().await;
                flushing.store(true, Ordering::SeqCst);
                match stream.lock().await.pull_chunk().await {
                    Ok(chunk) if !chunk.is_empty() => lock_buffer(&chunks).push(chunk),
                    Ok(_) => {}
                    Err(err) => log::warn!("chunk pull failed: {err}"),
                }
                flushing.store(false, Ordering::SeqCst);
            }
        })
    }
}

impl Drop for ChunkedRecorder {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

fn lock_buffer(chunks: &Mutex<Vec<AudioChunk>>) -> MutexGuard<'_, Vec<AudioChunk>> {
    chunks.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedStream;

    fn recorder_with_feed(feed: Vec<Vec<u8>>, chunk_interval: Duration) -> ChunkedRecorder {
        let stream = ScriptedStream::new("audio/webm;codecs=opus", feed);
        ChunkedRecorder::new(
            Box::new(stream),
            RecorderConfig {
                chunk_interval,
                min_clip_bytes: MIN_CLIP_BYTES,
            },
        )
    }

    /// Interval short enough that a test sleep spans several ticks.
    const FAST: Duration = Duration::from_millis(10);

    /// Interval long enough that the timer never fires inside a test.
    const NEVER: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn clip_is_chunks_concatenated_in_capture_order() {
        let a = vec![0xAA; 64];
        let b = vec![0xBB; 32];
        let c = vec![0xCC; 16];
        let mut expected = Vec::new();
        expected.extend_from_slice(&a);
        expected.extend_from_slice(&b);
        expected.extend_from_slice(&c);

        let mut recorder = recorder_with_feed(vec![a, b, c], FAST);
        recorder.start().unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;

        let clip = recorder.stop().await.unwrap().unwrap();
        assert_eq!(clip.len(), expected.len());
        assert_eq!(clip.bytes, expected);
        assert_eq!(clip.media_type, "audio/webm;codecs=opus");
        assert_eq!(recorder.state(), RecorderState::Idle);
    }

    #[tokio::test]
    async fn undersized_final_clip_is_rejected() {
        let mut recorder = recorder_with_feed(vec![vec![1, 2, 3]], FAST);
        recorder.start().unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        match recorder.stop().await {
            Err(CaptureError::InvalidClip { len }) => assert_eq!(len, 3),
            other => panic!("expected InvalidClip, got {other:?}"),
        }
        // Stop is terminal even on rejection.
        assert_eq!(recorder.state(), RecorderState::Idle);
        assert_eq!(recorder.buffered_chunks(), 0);
    }

    #[tokio::test]
    async fn starting_twice_leaves_the_running_buffer_untouched() {
        let mut recorder = recorder_with_feed(vec![vec![7; 60], vec![8; 60]], FAST);
        recorder.start().unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let buffered = recorder.buffered_chunks();
        assert_eq!(buffered, 2);
        assert!(matches!(
            recorder.start(),
            Err(CaptureError::AlreadyRecording)
        ));
        assert_eq!(recorder.buffered_chunks(), buffered);

        let clip = recorder.stop().await.unwrap().unwrap();
        assert_eq!(clip.len(), 120);
    }

    #[tokio::test]
    async fn pause_freezes_the_buffer_and_resume_restarts_it() {
        let feed: Vec<Vec<u8>> = (0..10).map(|n| vec![n; 20]).collect();
        let mut recorder = recorder_with_feed(feed, FAST);
        recorder.start().unwrap();
        tokio::time::sleep(Duration::from_millis(15)).await;

        recorder.pause().await.unwrap();
        assert_eq!(recorder.state(), RecorderState::Paused);
        let frozen = recorder.buffered_chunks();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(recorder.buffered_chunks(), frozen);

        recorder.resume().unwrap();
        assert_eq!(recorder.state(), RecorderState::Recording);
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(recorder.buffered_chunks() > frozen);

        let _ = recorder.stop().await;
        assert_eq!(recorder.state(), RecorderState::Idle);
    }

    #[tokio::test]
    async fn flush_emits_at_boundaries_and_holds_small_remainders() {
        // No timer ticks; every chunk arrives through an explicit flush pull.
        let mut recorder =
            recorder_with_feed(vec![vec![1; 120], vec![2; 30], vec![3; 90]], NEVER);
        recorder.start().unwrap();

        let first = recorder.request_flush().await.unwrap().unwrap();
        assert_eq!(first.len(), 120);

        // 30 bytes is below the plausibility floor; it stays buffered.
        assert!(recorder.request_flush().await.unwrap().is_none());
        assert_eq!(recorder.buffered_chunks(), 1);

        // The held chunk joins the next boundary.
        let second = recorder.request_flush().await.unwrap().unwrap();
        assert_eq!(second.len(), 120);
        assert_eq!(&second.bytes[..30], &[2; 30][..]);
        assert_eq!(&second.bytes[30..], &[3; 90][..]);

        // Everything was flushed, so stopping yields no final clip.
        assert!(recorder.stop().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lifecycle_calls_require_an_active_recording() {
        let mut recorder = recorder_with_feed(vec![], NEVER);
        assert!(matches!(
            recorder.stop().await,
            Err(CaptureError::NotRecording)
        ));
        assert!(matches!(
            recorder.request_flush().await,
            Err(CaptureError::NotRecording)
        ));
        assert!(matches!(
            recorder.pause().await,
            Err(CaptureError::NotRecording)
        ));
        assert!(matches!(recorder.resume(), Err(CaptureError::NotRecording)));
    }

    #[tokio::test]
    async fn stop_with_nothing_buffered_is_a_quiet_no_op() {
        let mut recorder = recorder_with_feed(vec![], NEVER);
        recorder.start().unwrap();
        assert!(recorder.stop().await.unwrap().is_none());
        assert!(!recorder.is_flushing());
    }
}
