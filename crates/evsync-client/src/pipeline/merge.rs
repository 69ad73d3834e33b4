//! Fan-in sink: the single consumer of every worker's lines.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

/// Writes lines in arrival order until every sender is gone.
///
/// Returns the number of lines written.
pub(crate) async fn drain<W>(mut lines: mpsc::Receiver<String>, out: &mut W) -> std::io::Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while let Some(line) = lines.recv().await {
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
        written += 1;
    }
    Ok(written)
}
