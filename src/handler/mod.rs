//! Handler module - event handling and dispatch.
//!
//! Provides:
//! - [`HandlerRegistry`] - maps `"<action>/<event>"` routing keys to handlers
//! - [`EventContext`] - identifies the action instance and lets handlers
//!   send feedback
//!
//! # Example
//!
//! ```ignore
//! use deckwire_client::event::{DialRotateEvent, TouchTapEvent};
//! use deckwire_client::handler::HandlerRegistry;
//!
//! let registry = HandlerRegistry::new();
//!
//! registry.register("com.x.volume/dialRotate", |event: DialRotateEvent, ctx| async move {
//!     let mut payload = HashMap::new();
//!     payload.insert("value".to_string(), event.payload.ticks.to_string());
//!     ctx.set_feedback(payload).await
//! });
//!
//! registry.register("com.x.volume/touchTap", |_event: TouchTapEvent, _ctx| async move {
//!     Ok(())
//! });
//! ```

mod context;
mod registry;

pub use context::EventContext;
pub use registry::{BoxFuture, FromEvent, Handler, HandlerRegistry, HandlerResult, TypedHandler};
