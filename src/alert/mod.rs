//! End-of-countdown notifier.
//!
//! `AlertNotifier` starts the audio alert and asks the event loop to open
//! the popup. The notifier cannot reach the scheduler, so the popup request
//! travels over a channel that the loop drains after each dispatch.

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use crate::sound::{ring_bell, AlertPlayer, AudioBackend};
use crate::timer::Notifier;
use crate::types::Phase;

/// Request to open the end-of-timer popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupRequest {
    /// Phase whose countdown just finished
    pub finished: Phase,
}

/// Creates the popup request channel.
pub fn popup_channel() -> (Sender<PopupRequest>, Receiver<PopupRequest>) {
    crossbeam_channel::unbounded()
}

/// Notifier that plays the alert and requests the popup.
pub struct AlertNotifier {
    player: Box<dyn AlertPlayer>,
    popup_tx: Sender<PopupRequest>,
    extra_beep: bool,
}

impl AlertNotifier {
    pub fn new(player: Box<dyn AlertPlayer>, popup_tx: Sender<PopupRequest>) -> Self {
        Self {
            player,
            popup_tx,
            extra_beep: false,
        }
    }

    /// Rings the terminal bell in addition to the alert.
    pub fn set_extra_beep(&mut self, enabled: bool) {
        self.extra_beep = enabled;
    }

    pub fn extra_beep(&self) -> bool {
        self.extra_beep
    }

    pub fn backend(&self) -> AudioBackend {
        self.player.backend()
    }
}

impl Notifier for AlertNotifier {
    fn on_countdown_complete(&mut self, finished: Phase) {
        if let Err(e) = self.player.play() {
            warn!(error = %e, "alert playback failed, ringing bell");
            ring_bell();
        }
        if self.extra_beep {
            ring_bell();
        }

        if self.popup_tx.send(PopupRequest { finished }).is_err() {
            debug!("popup receiver dropped");
        }
    }

    fn stop_audio(&mut self) {
        self.player.stop();
    }
}

impl std::fmt::Debug for AlertNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertNotifier")
            .field("backend", &self.player.backend())
            .field("extra_beep", &self.extra_beep)
            .finish_non_exhaustive()
    }
}
