//! Event context for handlers.
//!
//! Identifies which action instance an event came from and lets the handler
//! answer it:
//! - `set_feedback` - update the layout values of this instance
//! - `send` - write any other message to the host
//!
//! # Example
//!
//! ```ignore
//! async fn on_rotate(event: DialRotateEvent, ctx: EventContext) -> Result<()> {
//!     let mut payload = HashMap::new();
//!     payload.insert("value".to_string(), event.payload.ticks.to_string());
//!     ctx.set_feedback(payload).await
//! }
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::error::Result;
use crate::event::{InboundEvent, SetFeedbackEvent};
use crate::writer::WriterHandle;

/// Context passed to event handlers.
///
/// `EventContext` is `Clone` and can be moved into tasks spawned by the
/// handler.
#[derive(Debug, Clone)]
pub struct EventContext {
    action: String,
    context: String,
    device: String,
    writer: Option<WriterHandle>,
}

impl EventContext {
    /// Create a context without a writer (for testing).
    pub fn new(
        action: impl Into<String>,
        context: impl Into<String>,
        device: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            context: context.into(),
            device: device.into(),
            writer: None,
        }
    }

    /// Create a context with a writer.
    pub fn with_writer(
        action: impl Into<String>,
        context: impl Into<String>,
        device: impl Into<String>,
        writer: WriterHandle,
    ) -> Self {
        Self {
            writer: Some(writer),
            ..Self::new(action, context, device)
        }
    }

    /// Build the context for a decoded event.
    pub(crate) fn for_event(event: &InboundEvent, writer: Option<WriterHandle>) -> Self {
        let (action, context, device) = event.target().unwrap_or_default();
        Self {
            action: action.to_string(),
            context: context.to_string(),
            device: device.to_string(),
            writer,
        }
    }

    /// Action UUID the event was routed for.
    #[inline]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Opaque action instance id assigned by the host.
    #[inline]
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Device the event came from.
    #[inline]
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Send `setFeedback` for this action instance.
    pub async fn set_feedback(&self, payload: HashMap<String, String>) -> Result<()> {
        self.send(&SetFeedbackEvent::new(self.context.clone(), payload))
            .await
    }

    /// Send an arbitrary JSON message to the host.
    pub async fn send<T: Serialize>(&self, message: &T) -> Result<()> {
        match &self.writer {
            Some(writer) => writer.send(message).await,
            // No writer configured (testing mode)
            None => Ok(()),
        }
    }
}
