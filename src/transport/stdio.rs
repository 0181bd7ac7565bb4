//! Stdin/stdout transport for running the console from a terminal or a pipe

use crate::transport::traits::{TransportConnector, TransportStream};
use anyhow::Result;
use async_trait::async_trait;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf, Stdin, Stdout};

/// Reads from the process stdin, writes to stdout
pub struct StdioTransportStream {
    stdin: Stdin,
    stdout: Stdout,
}

impl StdioTransportStream {
    pub fn new() -> Self {
        Self {
            stdin: tokio::io::stdin(),
            stdout: tokio::io::stdout(),
        }
    }
}

impl Default for StdioTransportStream {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncRead for StdioTransportStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.stdin).poll_read(cx, buf)
    }
}

impl AsyncWrite for StdioTransportStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.stdout).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.stdout).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.stdout).poll_shutdown(cx)
    }
}

#[async_trait]
impl TransportStream for StdioTransportStream {
    async fn shutdown(&mut self) -> Result<()> {
        // stdout stays open for the rest of the process
        tokio::io::AsyncWriteExt::flush(&mut self.stdout).await?;
        Ok(())
    }
}

/// Connector for the process's own stdin/stdout
#[derive(Debug, Default)]
pub struct StdioConnector;

#[async_trait]
impl TransportConnector for StdioConnector {
    type Stream = StdioTransportStream;

    async fn connect(&self) -> Result<Self::Stream> {
        Ok(StdioTransportStream::new())
    }

    fn name(&self) -> &'static str {
        "stdio"
    }

    fn endpoint(&self) -> String {
        "stdin/stdout".into()
    }
}
