//! WebSocket channel to the host.
//!
//! The host listens on `ws://localhost:<port>`. After connecting, the
//! stream is split so reads and writes can proceed independently: the
//! receive loop owns the [`WsReader`], the writer task owns the
//! [`WsWriter`].
//!
//! # Example
//!
//! ```ignore
//! use deckwire_client::transport::connect;
//!
//! let (mut writer, mut reader) = connect("localhost", 28196).await?;
//! writer.send_text(r#"{"event":"registerPlugin","uuid":"ABC"}"#.to_string()).await?;
//! while let Some(frame) = reader.recv().await {
//!     println!("{} bytes", frame?.len());
//! }
//! ```

use bytes::Bytes;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::error::Result;

/// Stream type produced by [`connect`].
pub type HostStream = MaybeTlsStream<TcpStream>;

/// Build the URL the host listens on.
pub fn host_url(host: &str, port: u16) -> String {
    format!("ws://{}:{}", host, port)
}

/// Connect to the host and split the socket.
///
/// # Errors
///
/// Returns [`DeckwireError::WebSocket`](crate::DeckwireError::WebSocket) if
/// the TCP connection or the WebSocket handshake fails.
pub async fn connect(host: &str, port: u16) -> Result<(WsWriter, WsReader)> {
    let url = host_url(host, port);
    let (ws_stream, _response) = tokio_tungstenite::connect_async(url.as_str()).await?;
    tracing::debug!("Connected to {}", url);
    Ok(split(ws_stream))
}

/// Split an established WebSocket into independent halves.
pub fn split<S>(ws_stream: WebSocketStream<S>) -> (WsWriter<S>, WsReader<S>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (sink, stream) = ws_stream.split();
    (WsWriter { sink }, WsReader { stream })
}

/// Write half of the host channel.
pub struct WsWriter<S = HostStream> {
    sink: SplitSink<WebSocketStream<S>, Message>,
}

impl<S> WsWriter<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Send one text frame and flush.
    pub async fn send_text(&mut self, text: String) -> Result<()> {
        self.sink.send(Message::Text(text)).await?;
        Ok(())
    }

    /// Queue a text frame without flushing.
    pub async fn feed_text(&mut self, text: String) -> Result<()> {
        self.sink.feed(Message::Text(text)).await?;
        Ok(())
    }

    /// Flush queued frames.
    pub async fn flush(&mut self) -> Result<()> {
        self.sink.flush().await?;
        Ok(())
    }

    /// Send a close frame and shut the write half down.
    pub async fn close(&mut self) -> Result<()> {
        self.sink.close().await?;
        Ok(())
    }
}

/// Read half of the host channel.
pub struct WsReader<S = HostStream> {
    stream: SplitStream<WebSocketStream<S>>,
}

impl<S> WsReader<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Receive the next data frame.
    ///
    /// Text and binary frames are returned as raw bytes. Control frames are
    /// skipped. Returns `None` once the host closes the channel.
    pub async fn recv(&mut self) -> Option<Result<Bytes>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(Bytes::from(text))),
                Ok(Message::Binary(data)) => return Some(Ok(Bytes::from(data))),
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) | Ok(Message::Frame(_)) => continue,
                Ok(Message::Close(frame)) => {
                    match frame {
                        Some(cf) => tracing::debug!(
                            "Host closed channel: {} {}",
                            u16::from(cf.code),
                            cf.reason
                        ),
                        None => tracing::debug!("Host closed channel"),
                    }
                    return None;
                }
                Err(tungstenite::Error::ConnectionClosed) => return None,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
