//! Transport trait abstraction for pluggable line sources

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

/// A byte stream carrying console lines in both directions
#[async_trait]
pub trait TransportStream: AsyncRead + AsyncWrite + Send + Unpin + 'static {
    /// Flush pending output and release the underlying device
    async fn shutdown(&mut self) -> Result<()>;
}

/// Opens a transport stream
#[async_trait]
pub trait TransportConnector: Send + Sync {
    /// The stream type this connector produces
    type Stream: TransportStream;

    /// Open the transport, returning a stream on success
    async fn connect(&self) -> Result<Self::Stream>;

    /// Short transport name for logs (e.g. "serial")
    fn name(&self) -> &'static str;

    /// Where this connector points, for logs
    fn endpoint(&self) -> String;
}
