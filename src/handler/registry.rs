//! Handler registry for dispatching events by routing key.
//!
//! The registry maps `"<action>/<event>"` keys to handlers. It is a cheap,
//! cloneable handle over a shared map: the plugin, the receive loop, and any
//! application task can hold a clone and register handlers at any time,
//! including while events are being dispatched.
//!
//! # Example
//!
//! ```
//! use deckwire_client::event::DialRotateEvent;
//! use deckwire_client::handler::HandlerRegistry;
//!
//! let registry = HandlerRegistry::new();
//! registry.register("com.x.volume/dialRotate", |event: DialRotateEvent, _ctx| async move {
//!     println!("turned {} ticks", event.payload.ticks);
//!     Ok(())
//! });
//! assert!(registry.contains("com.x.volume/dialRotate"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock};

use super::EventContext;
use crate::error::{DeckwireError, Result};
use crate::event::{
    DialPressEvent, DialRotateEvent, EventKind, InboundEvent, TouchTapEvent, WillAppearEvent,
};

/// Result type for handler functions.
pub type HandlerResult = Result<()>;

/// Boxed future for handler results.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Types a handler can take as its event argument.
///
/// Implemented for every concrete event shape and for [`InboundEvent`]
/// itself, which accepts any decoded event.
pub trait FromEvent: Sized + Send + 'static {
    /// Discriminator this type accepts, for error reporting.
    const EXPECTS: &'static str;

    /// Extract `Self` from a decoded event.
    fn from_event(event: InboundEvent) -> Result<Self>;
}

impl FromEvent for InboundEvent {
    const EXPECTS: &'static str = "any event";

    fn from_event(event: InboundEvent) -> Result<Self> {
        Ok(event)
    }
}

macro_rules! impl_from_event {
    ($ty:ty, $variant:ident) => {
        impl FromEvent for $ty {
            const EXPECTS: &'static str = EventKind::$variant.as_str();

            fn from_event(event: InboundEvent) -> Result<Self> {
                match event {
                    InboundEvent::$variant(inner) => Ok(inner),
                    other => Err(DeckwireError::EventMismatch {
                        expected: Self::EXPECTS,
                        found: other.event_name().to_string(),
                    }),
                }
            }
        }
    };
}

impl_from_event!(TouchTapEvent, TouchTap);
impl_from_event!(DialPressEvent, DialPress);
impl_from_event!(DialRotateEvent, DialRotate);
impl_from_event!(WillAppearEvent, WillAppear);

/// Trait for handler functions.
pub trait Handler: Send + Sync + 'static {
    /// Handle a decoded event.
    fn call(&self, event: InboundEvent, ctx: EventContext) -> BoxFuture<'static, HandlerResult>;
}

/// Wrapper that converts the decoded event before calling the handler.
pub struct TypedHandler<F, T, Fut>
where
    F: Fn(T, EventContext) -> Fut + Send + Sync + 'static,
    T: FromEvent,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    handler: F,
    _phantom: PhantomData<fn(T) -> Fut>,
}

impl<F, T, Fut> TypedHandler<F, T, Fut>
where
    F: Fn(T, EventContext) -> Fut + Send + Sync + 'static,
    T: FromEvent,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    /// Create a new typed handler.
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            _phantom: PhantomData,
        }
    }
}

impl<F, T, Fut> Handler for TypedHandler<F, T, Fut>
where
    F: Fn(T, EventContext) -> Fut + Send + Sync + 'static,
    T: FromEvent,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, event: InboundEvent, ctx: EventContext) -> BoxFuture<'static, HandlerResult> {
        let typed = match T::from_event(event) {
            Ok(v) => v,
            Err(e) => return Box::pin(async move { Err(e) }),
        };

        Box::pin((self.handler)(typed, ctx))
    }
}

type HandlerMap = HashMap<String, Arc<dyn Handler>>;

/// Registry mapping routing keys to handlers.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: Arc<RwLock<HandlerMap>>,
}

impl HandlerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `key`, replacing any existing one.
    ///
    /// # Arguments
    ///
    /// * `key` - Routing key, `"<action>/<event>"`
    /// * `handler` - Function taking `(T, EventContext)` where `T` is an event
    ///   shape or [`InboundEvent`]
    pub fn register<F, T, Fut>(&self, key: impl Into<String>, handler: F)
    where
        F: Fn(T, EventContext) -> Fut + Send + Sync + 'static,
        T: FromEvent,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.register_handler(key, Arc::new(TypedHandler::new(handler)));
    }

    /// Register an already boxed handler. Returns the handler it replaced.
    pub fn register_handler(
        &self,
        key: impl Into<String>,
        handler: Arc<dyn Handler>,
    ) -> Option<Arc<dyn Handler>> {
        let key = key.into();
        let previous = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), handler);

        tracing::info!("registered {}", key);
        previous
    }

    /// Get the handler for `key`.
    ///
    /// The lock is released before this returns, so the handler can run
    /// while other tasks register.
    pub fn lookup(&self, key: &str) -> Option<Arc<dyn Handler>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Whether a handler is registered for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Dispatch an event to the handler registered for `key`.
    ///
    /// # Arguments
    ///
    /// * `key` - Routing key computed from the event
    /// * `event` - Decoded event
    /// * `ctx` - Context for answering the host
    pub async fn dispatch(&self, key: &str, event: InboundEvent, ctx: EventContext) -> Result<()> {
        let handler = self
            .lookup(key)
            .ok_or_else(|| DeckwireError::HandlerNotFound(key.to_string()))?;

        handler.call(event, ctx).await
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
