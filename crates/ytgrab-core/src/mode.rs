//! Download mode selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Request mode values that select audio extraction.
const AUDIO_ALIASES: &[&str] = &["audio", "son", "music"];

/// What the downloader should produce for a job.
///
/// Selects the downloader's format arguments: a merged video file, or an
/// extracted audio track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadMode {
    /// Best video and audio streams merged into one container.
    #[default]
    Video,
    /// Best audio stream, extracted and transcoded.
    Audio,
}

impl DownloadMode {
    /// Normalize a free-form mode string from a request.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Recognized audio aliases map to [`DownloadMode::Audio`]; everything
    /// else, including the empty string, maps to [`DownloadMode::Video`].
    pub fn normalize(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        if AUDIO_ALIASES.contains(&lowered.as_str()) {
            Self::Audio
        } else {
            Self::Video
        }
    }

    /// Lowercase name, as serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for DownloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DownloadMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::normalize(s))
    }
}
