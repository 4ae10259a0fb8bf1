//! Naming rules for uploaded audio.
//!
//! Stored files are keyed by the SHA-256 of their bytes, so identical
//! uploads resolve to one path under the media root.

use std::fmt;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::validation::FieldErrors;

/// Accepted audio file extensions (lowercase, without the dot).
pub const SUPPORTED_AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "m4a", "aac"];

/// Subdirectory of the media root holding track audio.
pub const TRACKS_DIR: &str = "tracks";

/// SHA-256 digest of an uploaded file. Displays as lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    pub fn of(data: &[u8]) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&Sha256::digest(data));
        Self(bytes)
    }

    /// Path relative to the media root: `tracks/<hex>.<ext>`.
    pub fn track_path(&self, ext: &str) -> String {
        format!("{TRACKS_DIR}/{self}.{ext}")
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Extract and validate the extension of an uploaded file name.
///
/// Matching is case-insensitive; the lowercase extension is returned. A
/// missing or unsupported extension is a field error on `audio_file`.
pub fn audio_extension(filename: &str) -> Result<String, CoreError> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if SUPPORTED_AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        return Ok(ext);
    }

    let shown = if ext.is_empty() {
        "(none)".to_string()
    } else {
        format!(".{ext}")
    };
    Err(FieldErrors::single(
        "audio_file",
        format!(
            "Unsupported audio format '{shown}'. Supported: {}",
            SUPPORTED_AUDIO_EXTENSIONS.join(", ")
        ),
    )
    .into())
}
