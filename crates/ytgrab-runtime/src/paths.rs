//! Downloader executable location.
//!
//! The downloader is expected beside the running program. When it is not
//! there, the current working directory is tried, which is how the program
//! behaves when launched from a development checkout.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

/// Environment variable overriding the downloader path.
pub const DOWNLOADER_ENV: &str = "YTGRAB_DOWNLOADER";

/// Base name of the downloader executable.
pub const DOWNLOADER_NAME: &str = "youtube-dl";

/// Errors that can occur while resolving the downloader location.
#[derive(Debug, Error)]
pub enum PathError {
    /// The running program's own path could not be determined.
    #[error("Cannot determine executable directory: {0}")]
    ExecutableDir(String),
}

/// How the downloader path was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloaderSource {
    /// Passed explicitly (CLI flag).
    Explicit,
    /// From `YTGRAB_DOWNLOADER`.
    EnvVar,
    /// Found beside the running program.
    ExecutableDir,
    /// Found in the current working directory.
    WorkingDir,
    /// Not found anywhere; launches will fail.
    Missing,
}

/// Resolved downloader executable and the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloaderLocation {
    /// Executable to launch.
    pub program: PathBuf,
    /// Working directory of the spawned process; output files land here.
    pub work_dir: PathBuf,
    /// How `program` was found.
    pub source: DownloaderSource,
}

/// Platform file name of the downloader (`youtube-dl` or `youtube-dl.exe`).
pub fn downloader_file_name() -> String {
    format!("{DOWNLOADER_NAME}{}", env::consts::EXE_SUFFIX)
}

/// Resolve the downloader executable.
///
/// Resolution order:
/// 1. Explicit path provided by caller (highest priority)
/// 2. `YTGRAB_DOWNLOADER` environment variable
/// 3. Beside the running program
/// 4. The current working directory (which then also becomes the output directory)
///
/// When nothing is found the program-directory path is returned anyway, so
/// jobs fail at launch with a descriptive error.
pub fn resolve_downloader(explicit: Option<&Path>) -> Result<DownloaderLocation, PathError> {
    let exe = env::current_exe().map_err(|e| PathError::ExecutableDir(e.to_string()))?;
    let exe_dir = exe
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| PathError::ExecutableDir(exe.display().to_string()))?;

    let from_env = env::var_os(DOWNLOADER_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    let cwd = env::current_dir().ok();

    let location = locate(explicit, from_env, &exe_dir, cwd.as_deref());
    match location.source {
        DownloaderSource::WorkingDir => info!(
            target: "ytgrab.paths",
            exe_dir = %exe_dir.display(),
            work_dir = %location.work_dir.display(),
            "Downloader not beside the program, using the working directory"
        ),
        DownloaderSource::Missing => warn!(
            target: "ytgrab.paths",
            expected = %location.program.display(),
            "Downloader executable not found; downloads will fail"
        ),
        _ => {}
    }
    Ok(location)
}

fn locate(
    explicit: Option<&Path>,
    from_env: Option<PathBuf>,
    exe_dir: &Path,
    cwd: Option<&Path>,
) -> DownloaderLocation {
    let beside_program = |program: PathBuf, source| DownloaderLocation {
        program,
        work_dir: exe_dir.to_path_buf(),
        source,
    };

    if let Some(path) = explicit {
        return beside_program(path.to_path_buf(), DownloaderSource::Explicit);
    }
    if let Some(path) = from_env {
        return beside_program(path, DownloaderSource::EnvVar);
    }

    let file_name = downloader_file_name();
    let in_exe_dir = exe_dir.join(&file_name);
    if in_exe_dir.is_file() {
        return beside_program(in_exe_dir, DownloaderSource::ExecutableDir);
    }

    if let Some(cwd) = cwd {
        let in_cwd = cwd.join(&file_name);
        if in_cwd.is_file() {
            return DownloaderLocation {
                program: in_cwd,
                work_dir: cwd.to_path_buf(),
                source: DownloaderSource::WorkingDir,
            };
        }
    }

    beside_program(in_exe_dir, DownloaderSource::Missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch_downloader(dir: &Path) -> PathBuf {
        let path = dir.join(downloader_file_name());
        fs::write(&path, b"stub").unwrap();
        path
    }

    #[test]
    fn explicit_path_wins() {
        let exe_dir = tempfile::tempdir().unwrap();
        touch_downloader(exe_dir.path());

        let location = locate(
            Some(Path::new("/opt/yt/youtube-dl")),
            Some(PathBuf::from("/env/youtube-dl")),
            exe_dir.path(),
            None,
        );
        assert_eq!(location.source, DownloaderSource::Explicit);
        assert_eq!(location.program, Path::new("/opt/yt/youtube-dl"));
        assert_eq!(location.work_dir, exe_dir.path());
    }

    #[test]
    fn env_var_beats_lookup() {
        let exe_dir = tempfile::tempdir().unwrap();
        let location = locate(None, Some(PathBuf::from("/env/youtube-dl")), exe_dir.path(), None);
        assert_eq!(location.source, DownloaderSource::EnvVar);
        assert_eq!(location.program, Path::new("/env/youtube-dl"));
    }

    #[test]
    fn finds_downloader_beside_program() {
        let exe_dir = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();
        let expected = touch_downloader(exe_dir.path());
        touch_downloader(cwd.path());

        let location = locate(None, None, exe_dir.path(), Some(cwd.path()));
        assert_eq!(location.source, DownloaderSource::ExecutableDir);
        assert_eq!(location.program, expected);
        assert_eq!(location.work_dir, exe_dir.path());
    }

    #[test]
    fn falls_back_to_working_directory() {
        let exe_dir = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();
        let expected = touch_downloader(cwd.path());

        let location = locate(None, None, exe_dir.path(), Some(cwd.path()));
        assert_eq!(location.source, DownloaderSource::WorkingDir);
        assert_eq!(location.program, expected);
        assert_eq!(location.work_dir, cwd.path());
    }

    #[test]
    fn missing_downloader_keeps_program_directory_path() {
        let exe_dir = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();

        let location = locate(None, None, exe_dir.path(), Some(cwd.path()));
        assert_eq!(location.source, DownloaderSource::Missing);
        assert_eq!(location.program, exe_dir.path().join(downloader_file_name()));
        assert_eq!(location.work_dir, exe_dir.path());
    }
}
