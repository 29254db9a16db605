//! Sound system error types.
//!
//! Every audio failure is recoverable: the alert degrades to the terminal
//! bell and the countdown keeps going.

use thiserror::Error;

/// Errors that can occur in the sound playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Sound file was not found at the specified path.
    #[error("sound file not found: {0}")]
    FileNotFound(String),

    /// Failed to decode the audio file.
    #[error("failed to decode sound file: {0}")]
    DecodeError(String),

    /// Failed to create the audio output stream.
    #[error("failed to create audio stream: {0}")]
    StreamError(String),

    /// No external audio player was found on this system.
    #[error("no audio player found (tried: {0})")]
    PlayerNotFound(String),

    /// Generic sound playback error.
    #[error("sound playback error: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if this error is related to the audio file.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }

    /// Returns true if another backend might still play the file.
    #[must_use]
    pub fn should_try_next_backend(&self) -> bool {
        matches!(
            self,
            Self::DeviceNotAvailable(_) | Self::StreamError(_) | Self::DecodeError(_)
        )
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "connect an audio output device",
            Self::FileNotFound(_) => "pass --alert-sound or put alert.mp3 next to the binary",
            Self::DecodeError(_) => "the sound file may be corrupted or in an unsupported format",
            Self::StreamError(_) => "check your audio settings",
            Self::PlayerNotFound(_) => "install paplay, aplay or ffplay",
            Self::PlaybackError(_) => "restart the application",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SoundError::DeviceNotAvailable("no device".to_string());
        assert_eq!(err.to_string(), "audio device not available: no device");

        let err = SoundError::FileNotFound("/path/to/alert.mp3".to_string());
        assert!(err.to_string().contains("/path/to/alert.mp3"));

        let err = SoundError::PlayerNotFound("paplay, aplay".to_string());
        assert!(err.to_string().contains("paplay, aplay"));
    }

    #[test]
    fn test_is_device_error() {
        assert!(SoundError::DeviceNotAvailable("x".into()).is_device_error());
        assert!(SoundError::StreamError("x".into()).is_device_error());
        assert!(!SoundError::FileNotFound("x".into()).is_device_error());
        assert!(!SoundError::PlayerNotFound("x".into()).is_device_error());
    }

    #[test]
    fn test_is_file_error() {
        assert!(SoundError::FileNotFound("x".into()).is_file_error());
        assert!(SoundError::DecodeError("x".into()).is_file_error());
        assert!(!SoundError::StreamError("x".into()).is_file_error());
    }

    #[test]
    fn test_should_try_next_backend() {
        assert!(SoundError::DeviceNotAvailable("x".into()).should_try_next_backend());
        assert!(SoundError::DecodeError("x".into()).should_try_next_backend());
        assert!(!SoundError::FileNotFound("x".into()).should_try_next_backend());
        assert!(!SoundError::PlayerNotFound("x".into()).should_try_next_backend());
    }

    #[test]
    fn test_suggestion() {
        assert!(SoundError::FileNotFound("x".into())
            .suggestion()
            .contains("--alert-sound"));
        assert!(SoundError::PlayerNotFound("x".into())
            .suggestion()
            .contains("paplay"));
    }
}
