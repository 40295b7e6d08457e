//! Combined downloader output.
//!
//! stdout and stderr are read concurrently and merged into a single stream
//! of lines in arrival order, so the transcript interleaves them the way a
//! terminal would. Lines are decoded lossily: the downloader prints titles
//! in whatever encoding the platform gives it.

use std::io;
use std::pin::pin;
use std::sync::Arc;

use futures_util::{Stream, StreamExt, stream};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, warn};
use ytgrab_core::{Job, LineInterpreter};

/// Lines of `reader`, newline included. Ends after the first read error.
fn lines<R>(reader: R) -> impl Stream<Item = io::Result<String>> + Send
where
    R: AsyncRead + Unpin + Send,
{
    stream::unfold(Some(BufReader::new(reader)), |state| async move {
        let mut reader = state?;
        let mut buf = Vec::new();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => None,
            Ok(_) => Some((Ok(String::from_utf8_lossy(&buf).into_owned()), Some(reader))),
            Err(e) => Some((Err(e), None)),
        }
    })
}

/// Merge two output pipes into one line stream, in arrival order.
pub fn merged_lines<A, B>(stdout: A, stderr: B) -> impl Stream<Item = io::Result<String>> + Send
where
    A: AsyncRead + Unpin + Send,
    B: AsyncRead + Unpin + Send,
{
    stream::select(lines(stdout), lines(stderr))
}

/// Feed every line of `output` to `interpreter` on behalf of `job`.
///
/// A clean end of stream ends the reader silently. A read error is noted in
/// the transcript and ends the reader; it does not fail the job, whose
/// outcome is decided by the process exit status.
pub async fn read_output<S>(job: Arc<Job>, interpreter: Arc<LineInterpreter>, output: S)
where
    S: Stream<Item = io::Result<String>>,
{
    let mut output = pin!(output);
    while let Some(line) = output.next().await {
        match line {
            Ok(line) => {
                interpreter.feed(&job, &line);
            }
            Err(e) => {
                warn!(target: "ytgrab.runner", job_id = %job.id(), error = %e, "Output stream interrupted");
                job.append_log(format!("output stream interrupted: {e}"));
                return;
            }
        }
    }
    debug!(target: "ytgrab.runner", job_id = %job.id(), "Output stream closed");
}
