//! Alert player implementation using rodio.
//!
//! The sink of the current alert is kept instead of detached, so the alert
//! can be cut off when the popup closes or the app exits.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::debug;

use super::error::SoundError;
use super::{AlertPlayer, AudioBackend};

/// Plays the alert file through the default output device.
pub struct RodioAlertPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    /// Alert file played on every completion
    path: PathBuf,
    /// Sink of the alert currently playing
    sink: Option<Sink>,
}

impl RodioAlertPlayer {
    /// Opens the default output device and checks that `path` decodes.
    ///
    /// # Errors
    ///
    /// - `SoundError::DeviceNotAvailable` if there is no output device
    /// - `SoundError::FileNotFound` / `SoundError::DecodeError` for a bad file
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, SoundError> {
        let path = path.into();
        decode(&path)?;

        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!(path = %path.display(), "audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            path,
            sink: None,
        })
    }

    /// Returns the alert file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true while an alert is audible.
    pub fn is_playing(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| !sink.empty())
    }
}

impl AlertPlayer for RodioAlertPlayer {
    fn play(&mut self) -> Result<(), SoundError> {
        self.stop();

        let decoder = decode(&self.path)?;
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| SoundError::StreamError(e.to_string()))?;
        sink.append(decoder);
        self.sink = Some(sink);

        debug!("alert playback started");
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
            debug!("alert playback stopped");
        }
    }

    fn backend(&self) -> AudioBackend {
        AudioBackend::Rodio
    }
}

impl Drop for RodioAlertPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for RodioAlertPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioAlertPlayer")
            .field("path", &self.path)
            .field("playing", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, SoundError> {
    let file = File::open(path)
        .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    Decoder::new(BufReader::new(file)).map_err(|e| SoundError::DecodeError(e.to_string()))
}
