//! Transport module - the WebSocket channel to the host.
//!
//! Provides:
//! - [`connect`] - open `ws://<host>:<port>` and split the socket
//! - [`WsReader`] / [`WsWriter`] - independent read and write halves

mod socket;

pub use socket::{connect, host_url, split, HostStream, WsReader, WsWriter};
