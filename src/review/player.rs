//! Playback position and seeking
//!
//! The review screen only needs a handful of player operations. The
//! [`VideoPlayer`] trait names them; [`PlaybackClock`] is the in-process
//! implementation driven by position updates.

use tracing::{debug, warn};

use crate::error::{ClientError, Result};

/// Distance covered by the skip buttons
pub const SKIP_SECS: f64 = 10.0;

/// Player lifecycle
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlayerStatus {
    #[default]
    Loading,
    Ready,
    /// Initialization failed; the UI offers a retry
    Failed(String),
}

/// Operations the review screen drives
pub trait VideoPlayer {
    fn status(&self) -> &PlayerStatus;
    fn position(&self) -> f64;
    fn duration(&self) -> f64;
    fn is_playing(&self) -> bool;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    /// Jump to `secs`, clamped to `[0, duration]`. Returns the new position.
    fn seek(&mut self, secs: f64) -> Result<f64>;

    fn skip_forward(&mut self) -> Result<f64> {
        let target = self.position() + SKIP_SECS;
        self.seek(target)
    }

    fn skip_backward(&mut self) -> Result<f64> {
        let target = self.position() - SKIP_SECS;
        self.seek(target)
    }

    fn toggle_playback(&mut self) -> Result<()> {
        if self.is_playing() {
            self.pause()
        } else {
            self.play()
        }
    }
}

/// Clamp a target into the playable range
pub fn clamp_seek(secs: f64, duration: f64) -> f64 {
    if secs.is_nan() {
        return 0.0;
    }
    secs.clamp(0.0, duration.max(0.0))
}

/// Player state tracked from position callbacks
#[derive(Debug, Clone, Default)]
pub struct PlaybackClock {
    source: String,
    status: PlayerStatus,
    position: f64,
    duration: f64,
    playing: bool,
}

impl PlaybackClock {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Clock already loaded with a known duration
    pub fn ready(source: impl Into<String>, duration: f64) -> Self {
        let mut clock = Self::new(source);
        clock.mark_ready(duration);
        clock
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn mark_ready(&mut self, duration: f64) {
        self.duration = duration.max(0.0);
        self.position = clamp_seek(self.position, self.duration);
        self.status = PlayerStatus::Ready;
        debug!(source = %self.source, duration = self.duration, "Player ready");
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(source = %self.source, %reason, "Player failed to initialize");
        self.playing = false;
        self.status = PlayerStatus::Failed(reason);
    }

    /// Go back to loading after a failure
    pub fn retry(&mut self) {
        if matches!(self.status, PlayerStatus::Failed(_)) {
            self.status = PlayerStatus::Loading;
        }
    }

    /// Position update from the decoder
    pub fn set_position(&mut self, secs: f64) {
        self.position = clamp_seek(secs, self.duration);
    }

    /// Advance while playing; stops at the end
    pub fn advance(&mut self, dt: f64) {
        if !self.playing {
            return;
        }
        self.position = clamp_seek(self.position + dt, self.duration);
        if self.position >= self.duration {
            self.playing = false;
        }
    }

    fn ensure_ready(&self) -> Result<()> {
        match &self.status {
            PlayerStatus::Ready => Ok(()),
            PlayerStatus::Loading => Err(ClientError::Player("player is still loading".to_string())),
            PlayerStatus::Failed(reason) => Err(ClientError::Player(reason.clone())),
        }
    }
}

impl VideoPlayer for PlaybackClock {
    fn status(&self) -> &PlayerStatus {
        &self.status
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self) -> Result<()> {
        self.ensure_ready()?;
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.ensure_ready()?;
        self.playing = false;
        Ok(())
    }

    fn seek(&mut self, secs: f64) -> Result<f64> {
        self.ensure_ready()?;
        self.position = clamp_seek(secs, self.duration);
        debug!(requested = secs, position = self.position, "Seek");
        Ok(self.position)
    }
}
