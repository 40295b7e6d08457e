//! Stopping a timed-out downloader: SIGTERM first, SIGKILL if it lingers.

use std::io;
use std::process::ExitStatus;
#[cfg(unix)]
use std::time::Duration;

use tokio::process::Child;
#[cfg(unix)]
use tokio::time::timeout;

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// How long a terminated downloader gets to clean up partial files.
#[cfg(unix)]
const TERM_GRACE: Duration = Duration::from_secs(5);

/// Stop `child` and reap it.
///
/// On unix the process gets SIGTERM and [`TERM_GRACE`] to exit before
/// SIGKILL. Elsewhere it is killed immediately.
pub async fn shutdown_child(mut child: Child) -> io::Result<ExitStatus> {
    #[cfg(unix)]
    {
        if terminate(&child)? {
            if let Ok(result) = timeout(TERM_GRACE, child.wait()).await {
                return result;
            }
        } else {
            return child.wait().await;
        }
    }

    child.kill().await?;
    child.wait().await
}

/// Send SIGTERM. Returns `false` if the process is already gone.
#[cfg(unix)]
fn terminate(child: &Child) -> io::Result<bool> {
    let Some(pid) = child.id() else {
        return Ok(false);
    };
    let pid = i32::try_from(pid).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    match signal::kill(Pid::from_raw(pid), Signal::SIGTERM) {
        Ok(()) => Ok(true),
        Err(nix::errno::Errno::ESRCH) => Ok(false),
        Err(e) => Err(io::Error::other(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::process::Command;
    use tokio::time::sleep;

    #[tokio::test]
    #[cfg(unix)]
    async fn stops_a_sleeping_process() {
        let child = Command::new("sleep")
            .arg("30")
            .spawn()
            .expect("failed to spawn sleep");

        let status = shutdown_child(child).await.unwrap();
        assert!(!status.success());
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn handles_already_exited() {
        let child = Command::new("true").spawn().expect("failed to spawn true");

        sleep(Duration::from_millis(100)).await;

        assert!(shutdown_child(child).await.is_ok());
    }
}
