//! Audio alert playback.
//!
//! This module provides the end-of-timer alert, including:
//!
//! - Alert file discovery
//! - Stoppable playback through rodio or an external player process
//! - Terminal bell fallback when no audio is available
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   select_player  │ ← checks once at startup
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │  dyn AlertPlayer │────▶│ RodioAlertPlayer │
//! │                  │     ├──────────────────┤
//! │                  │────▶│ProcessAlertPlayer│
//! │                  │     ├──────────────────┤
//! │                  │────▶│    BellPlayer    │
//! └──────────────────┘     └──────────────────┘
//! ```

mod error;
mod player;
mod process;
mod source;

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

pub use error::SoundError;
pub use player::RodioAlertPlayer;
pub use process::{PlayerCommand, ProcessAlertPlayer, PLAYER_COMMANDS};
pub use source::{find_system_sound, resolve_alert_sound, ALERT_FILE_NAMES};

/// Audio backend chosen at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioBackend {
    /// rodio sink on the default output device
    Rodio,
    /// External player process
    Process,
    /// Terminal bell only
    Bell,
}

impl AudioBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioBackend::Rodio => "rodio",
            AudioBackend::Process => "process",
            AudioBackend::Bell => "bell",
        }
    }
}

/// Trait for alert playback implementations.
///
/// `play` is non-blocking and restarts the alert if it is already playing.
/// `stop` must be safe to call at any time.
pub trait AlertPlayer {
    /// Starts the alert.
    ///
    /// # Errors
    ///
    /// Returns an error if playback could not be started.
    fn play(&mut self) -> Result<(), SoundError>;

    /// Stops the alert if it is playing.
    fn stop(&mut self);

    /// Returns the backend this player uses.
    fn backend(&self) -> AudioBackend;
}

/// Rings the terminal bell once.
pub fn ring_bell() {
    let mut stderr = std::io::stderr();
    let _ = stderr.write_all(b"\x07");
    let _ = stderr.flush();
}

/// Fallback player that rings the terminal bell.
#[derive(Debug, Default, Clone, Copy)]
pub struct BellPlayer;

impl AlertPlayer for BellPlayer {
    fn play(&mut self) -> Result<(), SoundError> {
        ring_bell();
        Ok(())
    }

    fn stop(&mut self) {}

    fn backend(&self) -> AudioBackend {
        AudioBackend::Bell
    }
}

// ============================================================================
// Backend selection
// ============================================================================

/// Audio settings from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundOptions {
    /// Alert file given with `--alert-sound`
    pub path: Option<PathBuf>,
    /// Skip file playback and use the bell
    pub muted: bool,
}

/// Probes the backends in order and returns the first that works.
///
/// Never fails: every failure is logged and the bell is used instead.
pub fn select_player(options: &SoundOptions) -> Box<dyn AlertPlayer> {
    if options.muted {
        info!("alert sound muted, using terminal bell");
        return Box::new(BellPlayer);
    }

    let path = match resolve_alert_sound(options.path.as_deref()) {
        Ok(path) => path,
        Err(e) => {
            warn!(error = %e, hint = e.suggestion(), "no alert sound, using terminal bell");
            return Box::new(BellPlayer);
        }
    };

    match RodioAlertPlayer::new(&path) {
        Ok(player) => {
            info!(path = %path.display(), backend = "rodio", "alert sound ready");
            return Box::new(player);
        }
        Err(e) => warn!(error = %e, "rodio playback unavailable"),
    }

    match ProcessAlertPlayer::detect(&path) {
        Ok(player) => {
            info!(path = %path.display(), player = player.program(), "alert sound ready");
            Box::new(player)
        }
        Err(e) => {
            warn!(error = %e, hint = e.suggestion(), "using terminal bell");
            Box::new(BellPlayer)
        }
    }
}

// ============================================================================
// MockAlertPlayer
// ============================================================================

/// Mock alert player for testing.
///
/// Clones share their counters, so a test can keep one clone while the
/// other is boxed into the notifier.
#[derive(Debug, Clone, Default)]
pub struct MockAlertPlayer {
    plays: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
    playing: Arc<AtomicBool>,
    should_fail: Arc<AtomicBool>,
}

impl MockAlertPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}

impl AlertPlayer for MockAlertPlayer {
    fn play(&mut self) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.plays.fetch_add(1, Ordering::SeqCst);
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.playing.store(false, Ordering::SeqCst);
    }

    fn backend(&self) -> AudioBackend {
        AudioBackend::Bell
    }
}
