//! # deckwire-client
//!
//! Rust client SDK for plugins driven by a deck host over a local
//! WebSocket.
//!
//! The host spawns the plugin with `-port`, `-pluginUUID`, `-registerEvent`
//! and `-info`. The plugin connects to `ws://localhost:<port>`, registers,
//! and from then on receives JSON events (dial rotations, touch taps,
//! visibility changes) and sends feedback back.
//!
//! ## Architecture
//!
//! - **Decoding**: every frame is classified by its `event` discriminator
//!   and decoded into an [`event::InboundEvent`]. Unknown kinds are logged
//!   and dropped.
//! - **Routing**: decoded events are dispatched by `"<action>/<event>"` to
//!   handlers in a shared [`handler::HandlerRegistry`].
//! - **Session**: one WebSocket per process; a receive task reads, a writer
//!   task writes.
//!
//! ## Example
//!
//! ```ignore
//! use deckwire_client::event::DialRotateEvent;
//! use deckwire_client::Plugin;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let plugin = Plugin::builder()
//!         .handle("com.x.volume/dialRotate", |event: DialRotateEvent, ctx| async move {
//!             let mut payload = std::collections::HashMap::new();
//!             payload.insert("value".to_string(), event.payload.ticks.to_string());
//!             ctx.set_feedback(payload).await
//!         })
//!         .start_from_env()
//!         .await?;
//!
//!     plugin.wait_for_shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod control;
pub mod error;
pub mod event;
pub mod handler;
pub mod transport;

mod plugin;
mod writer;

pub use control::{Info, LaunchArgs};
pub use error::{DeckwireError, Result};
pub use handler::{EventContext, HandlerRegistry};
pub use plugin::{Plugin, PluginBuilder, PluginConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_HOST};
pub use writer::{WriterConfig, WriterHandle};
