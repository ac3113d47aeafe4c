//! Dedicated writer task for outbound messages.
//!
//! The write half of the host channel is owned by a single task that
//! receives encoded messages over an mpsc channel. Application code and
//! handler contexts hold cheap [`WriterHandle`] clones, so sending never
//! contends with the receive loop.
//!
//! # Architecture
//!
//! ```text
//! Plugin::set_feedback ─┐
//! EventContext        ──┼─► mpsc::Sender<String> ─► Writer Task ─► WebSocket
//! EventContext        ──┘
//! ```

use serde::Serialize;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::codec::JsonCodec;
use crate::error::{DeckwireError, Result};
use crate::transport::WsWriter;

/// Default channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Maximum messages to queue before a single flush.
const MAX_BATCH_SIZE: usize = 64;

/// Configuration for the writer task.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Channel capacity for the message queue.
    pub channel_capacity: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Handle for sending messages to the writer task.
///
/// This is cheaply cloneable and can be shared across tasks.
#[derive(Debug, Clone)]
pub struct WriterHandle {
    tx: mpsc::Sender<String>,
    shutdown: watch::Receiver<bool>,
}

impl WriterHandle {
    /// Serialize `message` as JSON and queue it.
    pub async fn send<T: Serialize>(&self, message: &T) -> Result<()> {
        let text = JsonCodec::encode(message)?;
        self.send_text(text).await
    }

    /// Queue an already encoded message.
    ///
    /// Fails with [`DeckwireError::ConnectionClosed`] once the session has
    /// ended or the writer task has stopped.
    pub async fn send_text(&self, text: String) -> Result<()> {
        if *self.shutdown.borrow() {
            return Err(DeckwireError::ConnectionClosed);
        }
        self.tx
            .send(text)
            .await
            .map_err(|_| DeckwireError::ConnectionClosed)
    }

    /// Whether the session has ended or the writer task has stopped.
    pub fn is_closed(&self) -> bool {
        *self.shutdown.borrow() || self.tx.is_closed()
    }
}

/// Spawn the writer task and return a handle for sending messages.
///
/// The task ends cleanly when every handle is dropped or `shutdown` turns
/// `true`, and with an error when the channel fails. Messages still queued
/// at shutdown are discarded.
pub(crate) fn spawn_writer_task<S>(
    writer: WsWriter<S>,
    config: WriterConfig,
    shutdown: watch::Receiver<bool>,
) -> (WriterHandle, JoinHandle<Result<()>>)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
    let handle = WriterHandle {
        tx,
        shutdown: shutdown.clone(),
    };
    let task = tokio::spawn(async move {
        let result = writer_loop(rx, writer, shutdown).await;
        if let Err(e) = &result {
            tracing::error!("Writer error: {}", e);
        }
        result
    });
    (handle, task)
}

/// Receive messages and write them, flushing once per batch.
async fn writer_loop<S>(
    mut rx: mpsc::Receiver<String>,
    mut writer: WsWriter<S>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let first = tokio::select! {
            biased;
            _ = shutdown.wait_for(|closed| *closed) => break,
            next = rx.recv() => match next {
                Some(text) => text,
                None => break,
            },
        };
        writer.feed_text(first).await?;

        let mut batched = 1;
        while batched < MAX_BATCH_SIZE {
            match rx.try_recv() {
                Ok(text) => {
                    writer.feed_text(text).await?;
                    batched += 1;
                }
                Err(_) => break,
            }
        }

        writer.flush().await?;
    }

    rx.close();
    Ok(())
}
