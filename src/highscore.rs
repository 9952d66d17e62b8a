//! Persistent high score, one little-endian `u32` in a binary file
//!
//! Reads fail soft: a missing, short or unreadable file reads as zero with
//! a warning, so a fresh install and a corrupt file both just start over.
//! Writes are best effort; a failure is logged and play continues.

use std::path::PathBuf;

use crate::error::ArcadeError;

/// Handle to the high score file.
#[derive(Debug, Clone)]
pub struct HighScoreFile {
    path: PathBuf,
}

impl HighScoreFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The stored high score, or zero when there is none to be had.
    pub fn read(&self) -> u32 {
        match std::fs::read(&self.path) {
            Ok(bytes) => match bytes.first_chunk::<4>() {
                Some(raw) => u32::from_le_bytes(*raw),
                None => {
                    log::warn!(
                        "high score file {} is truncated, starting from 0",
                        self.path.display()
                    );
                    0
                }
            },
            Err(err) => {
                log::warn!(
                    "no high score at {} ({err}), starting from 0",
                    self.path.display()
                );
                0
            }
        }
    }

    /// Persist a new high score. Failure is logged, never fatal.
    pub fn write(&self, score: u32) {
        if let Err(err) = self.try_write(score) {
            log::warn!("could not save high score: {err}");
        }
    }

    fn try_write(&self, score: u32) -> Result<(), ArcadeError> {
        std::fs::write(&self.path, score.to_le_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> HighScoreFile {
        let dir = std::env::temp_dir().join("box_arcade_highscore_test");
        std::fs::create_dir_all(&dir).unwrap();
        HighScoreFile::new(dir.join(name))
    }

    #[test]
    fn test_missing_file_reads_zero() {
        let store = HighScoreFile::new(PathBuf::from("/nonexistent/scores.dat"));
        assert_eq!(store.read(), 0);
    }

    #[test]
    fn test_truncated_file_reads_zero() {
        let store = temp_store("short.dat");
        std::fs::write(&store.path, [0x2a, 0x00]).unwrap();
        assert_eq!(store.read(), 0);
        std::fs::remove_file(&store.path).ok();
    }

    #[test]
    fn test_write_read_round_trip() {
        let store = temp_store("round_trip.dat");
        store.write(1337);
        assert_eq!(store.read(), 1337);
        store.write(9001);
        assert_eq!(store.read(), 9001);
        std::fs::remove_file(&store.path).ok();
    }

    #[test]
    fn test_write_to_bad_path_is_non_fatal() {
        let store = HighScoreFile::new(PathBuf::from("/nonexistent/dir/scores.dat"));
        // Must not panic
        store.write(5);
        assert_eq!(store.read(), 0);
    }
}
