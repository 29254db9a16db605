//! Alert sound discovery.
//!
//! The alert file is resolved once at startup, in this order:
//! 1. the path given with `--alert-sound`
//! 2. `alert.mp3` / `alert.wav` next to the executable, then in the working directory
//! 3. a known system sound

use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::SoundError;

/// File names looked up next to the executable and in the working directory.
pub const ALERT_FILE_NAMES: &[&str] = &["alert.mp3", "alert.wav"];

/// System sounds to try, in order of preference.
#[cfg(target_os = "macos")]
const SYSTEM_SOUND_CANDIDATES: &[&str] = &[
    "/System/Library/Sounds/Glass.aiff",
    "/System/Library/Sounds/Ping.aiff",
    "/System/Library/Sounds/Pop.aiff",
];

#[cfg(not(target_os = "macos"))]
const SYSTEM_SOUND_CANDIDATES: &[&str] = &[
    "/usr/share/sounds/freedesktop/stereo/complete.oga",
    "/usr/share/sounds/alsa/Front_Center.wav",
    "/usr/share/sounds/sound-icons/bell.wav",
];

/// Resolves the alert file to play.
///
/// # Errors
///
/// Returns `SoundError::FileNotFound` if an explicit path does not exist, or
/// if no candidate file exists at all.
pub fn resolve_alert_sound(explicit: Option<&Path>) -> Result<PathBuf, SoundError> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(SoundError::FileNotFound(path.display().to_string()))
        };
    }

    let mut dirs = Vec::new();
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(dir);
    }
    if let Ok(dir) = std::env::current_dir() {
        dirs.push(dir);
    }

    if let Some(found) = find_in_dirs(&dirs, ALERT_FILE_NAMES) {
        debug!(path = %found.display(), "using bundled alert sound");
        return Ok(found);
    }

    find_system_sound().ok_or_else(|| {
        SoundError::FileNotFound(format!(
            "none of {} or a system sound",
            ALERT_FILE_NAMES.join(", ")
        ))
    })
}

/// Returns the first `dir/name` that exists, trying names within each directory.
fn find_in_dirs(dirs: &[PathBuf], names: &[&str]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}

/// Returns the first system sound that exists.
pub fn find_system_sound() -> Option<PathBuf> {
    SYSTEM_SOUND_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_path_exists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ding.wav");
        fs::write(&path, b"RIFF").unwrap();

        assert_eq!(resolve_alert_sound(Some(&path)).unwrap(), path);
    }

    #[test]
    fn test_explicit_path_missing() {
        let result = resolve_alert_sound(Some(Path::new("/nonexistent/ding.wav")));

        match result {
            Err(SoundError::FileNotFound(msg)) => assert!(msg.contains("ding.wav")),
            other => panic!("Expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(resolve_alert_sound(Some(dir.path())).is_err());
    }

    #[test]
    fn test_find_in_dirs_prefers_earlier_directory() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("alert.wav"), b"x").unwrap();
        fs::write(second.path().join("alert.mp3"), b"x").unwrap();

        let dirs = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let found = find_in_dirs(&dirs, ALERT_FILE_NAMES).unwrap();

        assert_eq!(found, first.path().join("alert.wav"));
    }

    #[test]
    fn test_find_in_dirs_prefers_mp3() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("alert.wav"), b"x").unwrap();
        fs::write(dir.path().join("alert.mp3"), b"x").unwrap();

        let found = find_in_dirs(&[dir.path().to_path_buf()], ALERT_FILE_NAMES).unwrap();

        assert_eq!(found, dir.path().join("alert.mp3"));
    }

    #[test]
    fn test_find_in_dirs_none() {
        let dir = TempDir::new().unwrap();
        assert!(find_in_dirs(&[dir.path().to_path_buf()], ALERT_FILE_NAMES).is_none());
    }

    #[test]
    fn test_find_system_sound_no_panic() {
        // Depends on the host; must not panic in containers
        let _ = find_system_sound();
    }
}
