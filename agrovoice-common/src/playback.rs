//! Local audio playback
//!
//! Shells out to the platform audio player to play a rendered advisory
//! file. Playback is best-effort: a missing player or a failed exit is
//! reported to the caller, who decides whether it matters (neither entry
//! point treats it as fatal).

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Player binary could not be spawned
    #[error("Failed to spawn audio player {player}: {source}")]
    Spawn {
        player: &'static str,
        source: std::io::Error,
    },

    /// No player command known for this platform
    #[error("No audio player configured for this platform")]
    UnsupportedPlatform,
}

/// Platform audio player command and its arguments for `path`
fn player_command(path: &Path) -> Result<(&'static str, Vec<String>), PlaybackError> {
    let path = path.display().to_string();
    if cfg!(target_os = "macos") {
        Ok(("afplay", vec![path]))
    } else if cfg!(target_os = "linux") {
        Ok(("aplay", vec![path]))
    } else if cfg!(target_os = "windows") {
        Ok((
            "powershell",
            vec![
                "-c".to_string(),
                format!("(New-Object Media.SoundPlayer '{}').PlaySync()", path),
            ],
        ))
    } else {
        Err(PlaybackError::UnsupportedPlatform)
    }
}

/// Play an audio file through the platform player.
///
/// Blocks a worker thread for the duration of playback. A non-zero exit
/// status is logged but not treated as an error.
pub async fn play(path: &Path) -> Result<(), PlaybackError> {
    let (player, args) = player_command(path)?;
    let audio: PathBuf = path.to_path_buf();

    let status = tokio::task::spawn_blocking(move || Command::new(player).args(&args).status())
        .await
        .map_err(|e| PlaybackError::Spawn {
            player,
            source: std::io::Error::new(std::io::ErrorKind::Other, e),
        })?
        .map_err(|source| PlaybackError::Spawn { player, source })?;

    if !status.success() {
        tracing::warn!(
            player = player,
            file = %audio.display(),
            code = ?status.code(),
            "Audio player exited with non-zero status"
        );
    }

    Ok(())
}
