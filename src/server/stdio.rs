//! Newline-delimited JSON-RPC over stdin/stdout.
//!
//! Each inbound line is handled on its own task so a slow PingOne call does
//! not hold up other requests. Responses funnel through one writer, which
//! keeps every output line whole. Logging goes to stderr and never touches
//! the protocol stream.

use super::PingOneMcpServer;
use log::{debug, info};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

impl PingOneMcpServer {
    /// Serve MCP over the process's stdin and stdout until stdin closes.
    pub async fn run_stdio(self: Arc<Self>) -> io::Result<()> {
        info!("Serving MCP over stdio");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve MCP over any line-oriented byte stream pair.
    ///
    /// Returns once the reader reaches end of input and every in-flight
    /// request has written its response.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, mut writer: W) -> io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let server = Arc::clone(&self);
        let read_loop = async move {
            let mut lines = BufReader::new(reader).lines();
            while let Some(line) = lines.next_line().await? {
                if line.trim().is_empty() {
                    continue;
                }
                let server = Arc::clone(&server);
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(response) = server.handle_message(&line).await {
                        // The writer only stops once every sender is gone.
                        let _ = tx.send(response);
                    }
                });
            }
            debug!("Input closed, draining in-flight requests");
            drop(tx);
            Ok::<(), io::Error>(())
        };

        let write_loop = async move {
            while let Some(response) = rx.recv().await {
                writer.write_all(response.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            Ok::<(), io::Error>(())
        };

        tokio::try_join!(read_loop, write_loop)?;
        info!("MCP session ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::client::{InMemoryPingOne, StaticClientProvider};
    use crate::server::PingOneMcpServer;
    use crate::tools::ToolRegistry;
    use serde_json::Value;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_serves_each_request_line() {
        let server = Arc::new(PingOneMcpServer::new(
            Arc::new(StaticClientProvider::new(Arc::new(InMemoryPingOne::new()))),
            ToolRegistry::with_builtin_tools(),
        ));

        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":3,"method":"ping"}"#,
            "\n"
        );
        let mut output = Vec::new();

        server.serve(input.as_bytes(), &mut output).await.unwrap();

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses.len(), 3);

        let mut ids: Vec<i64> = responses
            .iter()
            .map(|response| response["id"].as_i64().unwrap())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
