//! Alert player backed by an external audio command.
//!
//! Used when rodio cannot open a device or decode the file. The child
//! process is killed on stop, so the alert can still be cut off.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use tracing::{debug, warn};

use super::error::SoundError;
use super::{AlertPlayer, AudioBackend};

/// An external player command and the arguments placed before the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

/// Known players, in order of preference.
#[cfg(target_os = "macos")]
pub const PLAYER_COMMANDS: &[PlayerCommand] = &[PlayerCommand {
    program: "afplay",
    args: &[],
}];

#[cfg(not(target_os = "macos"))]
pub const PLAYER_COMMANDS: &[PlayerCommand] = &[
    PlayerCommand {
        program: "paplay",
        args: &[],
    },
    PlayerCommand {
        program: "aplay",
        args: &["-q"],
    },
    PlayerCommand {
        program: "ffplay",
        args: &["-nodisp", "-autoexit", "-loglevel", "quiet"],
    },
];

/// Plays the alert file by spawning a player process.
#[derive(Debug)]
pub struct ProcessAlertPlayer {
    command: PlayerCommand,
    executable: PathBuf,
    path: PathBuf,
    child: Option<Child>,
}

impl ProcessAlertPlayer {
    /// Finds the first known player on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::PlayerNotFound` listing the commands tried.
    pub fn detect(path: impl Into<PathBuf>) -> Result<Self, SoundError> {
        let search = std::env::var_os("PATH").unwrap_or_default();
        Self::detect_in(path, &search)
    }

    /// Like [`ProcessAlertPlayer::detect`], searching `search_path` instead of `PATH`.
    pub fn detect_in(path: impl Into<PathBuf>, search_path: &OsStr) -> Result<Self, SoundError> {
        for command in PLAYER_COMMANDS {
            if let Some(executable) = find_executable(command.program, search_path) {
                debug!(player = command.program, "found audio player");
                return Ok(Self {
                    command: *command,
                    executable,
                    path: path.into(),
                    child: None,
                });
            }
        }

        let tried: Vec<&str> = PLAYER_COMMANDS.iter().map(|c| c.program).collect();
        Err(SoundError::PlayerNotFound(tried.join(", ")))
    }

    /// Name of the player command in use.
    pub fn program(&self) -> &'static str {
        self.command.program
    }

    /// Returns true while the player process is alive.
    pub fn is_playing(&mut self) -> bool {
        matches!(self.child.as_mut().map(Child::try_wait), Some(Ok(None)))
    }
}

impl AlertPlayer for ProcessAlertPlayer {
    fn play(&mut self) -> Result<(), SoundError> {
        self.stop();

        let child = Command::new(&self.executable)
            .args(self.command.args)
            .arg(&self.path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SoundError::PlaybackError(format!("{}: {}", self.command.program, e)))?;

        debug!(player = self.command.program, pid = child.id(), "alert process started");
        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        if let Ok(None) = child.try_wait() {
            if let Err(e) = child.kill() {
                warn!(error = %e, "failed to stop alert process");
            }
        }
        // Reap the child so it does not linger as a zombie
        if let Err(e) = child.wait() {
            debug!(error = %e, "failed to reap alert process");
        }
        debug!("alert process stopped");
    }

    fn backend(&self) -> AudioBackend {
        AudioBackend::Process
    }
}

impl Drop for ProcessAlertPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn find_executable(program: &str, search_path: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_path)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn install_fake_player(dir: &Path, program: &str, script: &str) {
        let path = dir.join(program);
        fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_detect_fails_on_empty_path() {
        let dir = TempDir::new().unwrap();

        let result = ProcessAlertPlayer::detect_in("alert.mp3", dir.path().as_os_str());

        match result {
            Err(SoundError::PlayerNotFound(tried)) => {
                assert!(tried.contains(PLAYER_COMMANDS[0].program));
            }
            other => panic!("Expected PlayerNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_detect_ignores_non_executable_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PLAYER_COMMANDS[0].program), b"").unwrap();

        assert!(ProcessAlertPlayer::detect_in("alert.mp3", dir.path().as_os_str()).is_err());
    }

    #[test]
    fn test_play_and_stop_kills_process() {
        let dir = TempDir::new().unwrap();
        let program = PLAYER_COMMANDS[0].program;
        install_fake_player(dir.path(), program, "exec sleep 30");

        let mut player =
            ProcessAlertPlayer::detect_in("alert.mp3", dir.path().as_os_str()).unwrap();
        assert_eq!(player.program(), program);
        assert_eq!(player.backend(), AudioBackend::Process);

        player.play().unwrap();
        assert!(player.is_playing());

        player.stop();
        assert!(!player.is_playing());
    }

    #[test]
    fn test_stop_reaps_finished_process() {
        let dir = TempDir::new().unwrap();
        install_fake_player(dir.path(), PLAYER_COMMANDS[0].program, "exit 0");
        let mut player =
            ProcessAlertPlayer::detect_in("alert.mp3", dir.path().as_os_str()).unwrap();

        player.play().unwrap();
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while player.is_playing() && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        player.stop();
        assert!(!player.is_playing());

        // A reaped player can be started again
        player.play().unwrap();
        player.stop();
        assert!(!player.is_playing());
    }

    #[test]
    fn test_stop_without_play_is_noop() {
        let dir = TempDir::new().unwrap();
        install_fake_player(dir.path(), PLAYER_COMMANDS[0].program, "exit 0");

        let mut player =
            ProcessAlertPlayer::detect_in("alert.mp3", dir.path().as_os_str()).unwrap();
        player.stop();
        assert!(!player.is_playing());
    }
}
