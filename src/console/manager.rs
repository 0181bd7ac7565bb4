//! Console I/O task and its handle

use crate::transport::TransportStream;
use anyhow::{anyhow, Result};
use led_console_shared::codec::LineDecoder;
use std::collections::VecDeque;
use tokio::io::{AsyncReadExt, AsyncWriteExt, WriteHalf};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Events emitted by the console task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// A complete input line, terminator stripped
    Line(String),
    /// The transport ended; no more lines will arrive
    Closed { reason: String },
}

/// Handle to a running console task
pub struct Console {
    transport: &'static str,
    /// Channel to send reply lines to the transport
    outbound_tx: mpsc::Sender<String>,
    /// Channel to receive console events
    event_rx: mpsc::Receiver<ConsoleEvent>,
}

impl Console {
    /// Spawn the I/O task for `stream`. Dropping the handle shuts it down.
    pub fn start<S: TransportStream>(stream: S, transport: &'static str, max_line_len: usize) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::channel::<String>(32);
        let (event_tx, event_rx) = mpsc::channel::<ConsoleEvent>(32);

        tokio::spawn(async move {
            if let Err(e) = io_loop(stream, max_line_len, outbound_rx, &event_tx).await {
                let _ = event_tx
                    .send(ConsoleEvent::Closed {
                        reason: e.to_string(),
                    })
                    .await;
            }
        });

        Self {
            transport,
            outbound_tx,
            event_rx,
        }
    }

    /// Queue one reply line
    pub async fn send(&self, line: impl Into<String>) -> Result<()> {
        self.outbound_tx
            .send(line.into())
            .await
            .map_err(|_| anyhow!("{} console closed", self.transport))
    }

    /// Receive the next console event
    pub async fn recv(&mut self) -> Option<ConsoleEvent> {
        self.event_rx.recv().await
    }

    pub fn transport(&self) -> &'static str {
        self.transport
    }
}

/// Decoded events held back while the main loop is busy. Reading pauses
/// at this depth; replies keep flowing.
const MAX_PENDING_EVENTS: usize = 32;

/// Pump bytes between the transport and the channels.
///
/// Decoded lines are queued locally and handed to the main loop only when
/// the event channel has room, so a full event channel never stops reply
/// lines from being written. End of input or a read error is queued as
/// [`ConsoleEvent::Closed`] behind any pending lines. Returns `Ok(())` once
/// the handle is dropped, `Err` when writing to the transport fails.
async fn io_loop<S: TransportStream>(
    stream: S,
    max_line_len: usize,
    mut outbound_rx: mpsc::Receiver<String>,
    event_tx: &mpsc::Sender<ConsoleEvent>,
) -> Result<()> {
    let (mut reader, mut writer) = tokio::io::split(stream);

    let mut decoder = LineDecoder::new(max_line_len);
    let mut read_buf = vec![0u8; 512];
    let mut pending: VecDeque<ConsoleEvent> = VecDeque::new();
    let mut reading = true;

    loop {
        tokio::select! {
            // Send replies
            outbound = outbound_rx.recv() => {
                match outbound {
                    Some(line) => write_line(&mut writer, &line).await?,
                    None => break,
                }
            }

            // Hand the oldest queued event to the main loop
            permit = event_tx.reserve(), if !pending.is_empty() => {
                let Ok(permit) = permit else { break };
                if let Some(event) = pending.pop_front() {
                    permit.send(event);
                }
            }

            // Read incoming bytes
            result = reader.read(&mut read_buf), if reading && pending.len() < MAX_PENDING_EVENTS => {
                let n = match result {
                    Ok(0) => {
                        info!("[CONSOLE] End of input");
                        reading = false;
                        pending.push_back(ConsoleEvent::Closed {
                            reason: "end of input".into(),
                        });
                        continue;
                    }
                    Ok(n) => n,
                    Err(e) => {
                        error!("[CONSOLE] Read error: {}", e);
                        reading = false;
                        pending.push_back(ConsoleEvent::Closed {
                            reason: format!("Read error: {}", e),
                        });
                        continue;
                    }
                };
                decoder.extend(&read_buf[..n]);

                // Queue all complete lines
                loop {
                    match decoder.decode_next() {
                        Ok(Some(line)) => {
                            debug!("[CONSOLE] <- {:?}", line);
                            pending.push_back(ConsoleEvent::Line(line));
                        }
                        Ok(None) => break,
                        Err(e) => {
                            warn!("[CONSOLE] Dropped input: {}", e);
                            write_line(&mut writer, &format!("ERROR: {}", e)).await?;
                        }
                    }
                }
            }
        }
    }

    let mut stream = reader.unsplit(writer);
    TransportStream::shutdown(&mut stream).await?;
    info!("[CONSOLE] Transport shut down");
    Ok(())
}

async fn write_line<S: TransportStream>(writer: &mut WriteHalf<S>, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\r\n").await?;
    writer.flush().await?;
    Ok(())
}
