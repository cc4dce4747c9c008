//! Line-oriented interactive loop around an [`Agent`].

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

use crate::agent::Agent;
use crate::client::Client;
use crate::mcp::McpServer;

/// Whether an input line asks to end the session.
pub fn is_quit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("quit")
}

/// Read queries from `input` until `quit` or end of input, writing each
/// answer to `output`.
///
/// A failed turn, including an input line that is not valid UTF-8, is
/// reported and the loop moves on to the next query. Only end of input,
/// `quit` and I/O errors end it.
pub async fn chat_loop<C, S, R, W>(
    agent: &Agent<C, S>,
    mut input: R,
    mut output: W,
) -> std::io::Result<()>
where
    C: Client,
    S: McpServer,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output
        .write_all(b"\nMCP Client Started!\nType your queries or 'quit' to exit.\n")
        .await?;

    let mut buf = Vec::new();
    loop {
        output.write_all(b"\nQuery: ").await?;
        output.flush().await?;

        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                warn!("Unreadable input line: {}", e);
                output
                    .write_all(format!("\nError: input is not valid UTF-8: {e}\n").as_bytes())
                    .await?;
                continue;
            }
        };
        let query = line.trim();
        if is_quit(query) {
            break;
        }
        if query.is_empty() {
            continue;
        }

        let reply = match agent.process_query(query).await {
            Ok(answer) => format!("\n{answer}\n"),
            Err(e) => {
                warn!("Query failed: {}", e);
                format!("\nError: {e}\n")
            }
        };
        output.write_all(reply.as_bytes()).await?;
    }

    output.flush().await
}
