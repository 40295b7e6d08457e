//! Downloader command-line arguments.

use ytgrab_core::DownloadMode;

/// Output file name: source title plus native extension.
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// MP4 video with M4A audio, avoiding AV1, falling back to any single MP4
/// and finally to whatever is best.
const VIDEO_FORMAT: &str = "bestvideo[ext=mp4][vcodec!*=av01]+bestaudio[ext=m4a]/best[ext=mp4][vcodec!*=av01]/best[ext=mp4]/best";

const VIDEO_CONTAINER: &str = "mp4";
const AUDIO_FORMAT: &str = "bestaudio/best";
const AUDIO_CODEC: &str = "mp3";
/// Best VBR quality.
const AUDIO_QUALITY: &str = "0";

/// Build the argument list for `mode`, with `url` last.
///
/// `--newline` makes every progress update its own line, which is what the
/// output interpreter expects.
pub fn downloader_args(mode: DownloadMode, url: &str) -> Vec<String> {
    let mut args: Vec<String> = vec!["--newline".into(), "-o".into(), OUTPUT_TEMPLATE.into()];

    match mode {
        DownloadMode::Audio => args.extend(
            [
                "-f",
                AUDIO_FORMAT,
                "--extract-audio",
                "--audio-format",
                AUDIO_CODEC,
                "--audio-quality",
                AUDIO_QUALITY,
            ]
            .map(String::from),
        ),
        DownloadMode::Video => args.extend(
            ["-f", VIDEO_FORMAT, "--merge-output-format", VIDEO_CONTAINER].map(String::from),
        ),
    }

    args.push(url.to_string());
    args
}
