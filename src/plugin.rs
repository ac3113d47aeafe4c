//! Plugin builder and runtime loop.
//!
//! The [`PluginBuilder`] provides a fluent API for configuring handlers and
//! connection settings. The [`Plugin`] manages the lifecycle:
//! 1. Parse the `-info` document
//! 2. Connect to the host and send the registration message
//! 3. Spawn the writer task
//! 4. Read frames, decode them and dispatch to handlers
//!
//! # Example
//!
//! ```ignore
//! use deckwire_client::event::{DialRotateEvent, TouchTapEvent};
//! use deckwire_client::Plugin;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let plugin = Plugin::builder()
//!         .handle("com.x.volume/dialRotate", |event: DialRotateEvent, ctx| async move {
//!             let mut payload = HashMap::new();
//!             payload.insert("value".to_string(), event.payload.ticks.to_string());
//!             ctx.set_feedback(payload).await
//!         })
//!         .start_from_env()
//!         .await?;
//!
//!     plugin.handle("com.x.volume/touchTap", |_event: TouchTapEvent, _ctx| async { Ok(()) });
//!
//!     plugin.wait_for_shutdown().await;
//!     Ok(())
//! }
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::FutureExt;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::codec::decode_routed;
use crate::control::{build_register_message, Info, LaunchArgs};
use crate::error::{DeckwireError, Result};
use crate::event::SetFeedbackEvent;
use crate::handler::{EventContext, FromEvent, HandlerRegistry, HandlerResult};
use crate::transport::{connect, WsReader, WsWriter};
use crate::writer::{spawn_writer_task, WriterConfig, WriterHandle};

/// Default host name of the local WebSocket server.
pub const DEFAULT_HOST: &str = "localhost";

/// Default time allowed for connecting and registering.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings.
#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Host name the WebSocket server listens on.
    pub host: String,
    /// Deadline for connect plus registration.
    pub connect_timeout: Duration,
    /// Outbound queue settings.
    pub writer: WriterConfig,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            writer: WriterConfig::default(),
        }
    }
}

/// Builder for configuring and starting a plugin.
///
/// Handlers registered here are in place before the first event arrives.
/// More can be added later through [`Plugin::handle`].
#[derive(Debug, Default)]
pub struct PluginBuilder {
    registry: HandlerRegistry,
    config: PluginConfig,
}

impl PluginBuilder {
    /// Create a new plugin builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a routing key, `"<action>/<event>"`.
    pub fn handle<F, T, Fut>(self, key: impl Into<String>, handler: F) -> Self
    where
        F: Fn(T, EventContext) -> Fut + Send + Sync + 'static,
        T: FromEvent,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.registry.register(key, handler);
        self
    }

    /// Set the host name to connect to.
    ///
    /// Default: `localhost`
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the deadline for connecting and registering.
    ///
    /// Default: 60 seconds
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the outbound queue capacity.
    ///
    /// Default: 256
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.writer.channel_capacity = capacity;
        self
    }

    /// Parse the process arguments and start.
    pub async fn start_from_env(self) -> Result<Plugin> {
        let args = LaunchArgs::from_env()?;
        self.start(args).await
    }

    /// Connect, register and start the receive loop.
    ///
    /// Any failure here is fatal for the plugin; nothing is retried.
    pub async fn start(self, args: LaunchArgs) -> Result<Plugin> {
        Plugin::start(args, self.registry, self.config).await
    }
}

/// A running plugin session.
///
/// Use `handle()` to add handlers, `set_feedback()` to update action
/// instances, and `wait_for_shutdown()` to block until the host goes away.
#[derive(Debug)]
pub struct Plugin {
    uuid: String,
    info: Info,
    registry: HandlerRegistry,
    writer: WriterHandle,
    shutdown_rx: watch::Receiver<bool>,
    _writer_task: JoinHandle<Result<()>>,
}

impl Plugin {
    /// Create a new plugin builder.
    pub fn builder() -> PluginBuilder {
        PluginBuilder::new()
    }

    async fn start(args: LaunchArgs, registry: HandlerRegistry, config: PluginConfig) -> Result<Self> {
        // 1. Static host info; a bad document is fatal before any I/O
        let info = args.parse_info()?;

        // 2. Connect and register under one deadline
        let timeout = config.connect_timeout;
        let handshake = async {
            let (mut writer, reader) = connect(&config.host, args.port).await?;
            let register = build_register_message(&args)?;
            writer.send_text(register).await?;
            Ok::<_, DeckwireError>((writer, reader))
        };
        let (writer, reader) = tokio::time::timeout(timeout, handshake)
            .await
            .map_err(|_| DeckwireError::ConnectTimeout(timeout))??;

        tracing::info!("Registered plugin {}", args.plugin_uuid);

        // 3. Hand the channel to the writer task and the receive loop
        Ok(Self::spawn(
            args.plugin_uuid,
            info,
            reader,
            writer,
            registry,
            config.writer,
        ))
    }

    /// Spawn the writer task and the receive loop over an open channel.
    fn spawn<S>(
        uuid: String,
        info: Info,
        reader: WsReader<S>,
        writer: WsWriter<S>,
        registry: HandlerRegistry,
        writer_config: WriterConfig,
    ) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (writer, writer_task) = spawn_writer_task(writer, writer_config, shutdown_rx.clone());

        let loop_registry = registry.clone();
        let loop_writer = writer.clone();

        tokio::spawn(async move {
            let _guard = ShutdownGuard(shutdown_tx);
            match Self::receive_loop(reader, loop_registry, loop_writer).await {
                Ok(()) => tracing::info!("Host closed the connection"),
                Err(e) => tracing::error!("Receive loop error: {}", e),
            }
        });

        Plugin {
            uuid,
            info,
            registry,
            writer,
            shutdown_rx,
            _writer_task: writer_task,
        }
    }

    /// Main receive loop - reads frames and dispatches them to handlers.
    ///
    /// Ends with `Ok` when the host closes the channel and with the error
    /// on a read failure. Per-frame problems are logged and skipped.
    async fn receive_loop<S>(
        mut reader: WsReader<S>,
        registry: HandlerRegistry,
        writer: WriterHandle,
    ) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        loop {
            let frame = match reader.recv().await {
                None => return Ok(()),
                Some(Ok(frame)) => frame,
                Some(Err(e)) => return Err(e),
            };

            Self::dispatch_frame(&frame, &registry, &writer).await;
        }
    }

    /// Decode a single frame and run its handler to completion.
    async fn dispatch_frame(frame: &[u8], registry: &HandlerRegistry, writer: &WriterHandle) {
        let (key, event) = match decode_routed(frame) {
            Ok(Some(routed)) => routed,
            // Unrecognized, already reported by the decoder
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("Dropping malformed frame: {}", e);
                return;
            }
        };

        let Some(handler) = registry.lookup(key.as_str()) else {
            tracing::warn!("no handler found for {:?}", key.as_str());
            return;
        };

        tracing::debug!("executing handler for {:?}", key.as_str());
        let ctx = EventContext::for_event(&event, Some(writer.clone()));
        let outcome = AssertUnwindSafe(async move { handler.call(event, ctx).await })
            .catch_unwind()
            .await;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("Handler error for {}: {}", key, e),
            Err(panic) => {
                tracing::error!("Handler panicked for {}: {}", key, panic_message(&*panic))
            }
        }
    }

    /// Plugin instance id assigned by the host.
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Host information received at launch.
    pub fn info(&self) -> &Info {
        &self.info
    }

    /// Shared handle to the handler registry.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Register a handler while the plugin is running.
    ///
    /// Replaces any handler already registered for `key`.
    pub fn handle<F, T, Fut>(&self, key: impl Into<String>, handler: F)
    where
        F: Fn(T, EventContext) -> Fut + Send + Sync + 'static,
        T: FromEvent,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.registry.register(key, handler);
    }

    /// Send `setFeedback` for an action instance.
    pub async fn set_feedback(
        &self,
        context: impl Into<String>,
        payload: HashMap<String, String>,
    ) -> Result<()> {
        self.send(&SetFeedbackEvent::new(context, payload)).await
    }

    /// Send an arbitrary JSON message to the host.
    pub async fn send<T: Serialize>(&self, message: &T) -> Result<()> {
        self.writer.send(message).await
    }

    /// Whether the receive loop is still running.
    pub fn is_running(&self) -> bool {
        !*self.shutdown_rx.borrow()
    }

    /// Wait until the receive loop has ended (host closed the channel or a
    /// read failed). No further events are delivered afterwards.
    pub async fn wait_for_shutdown(&self) {
        let mut rx = self.shutdown_rx.clone();
        let _ = rx.wait_for(|closed| *closed).await;
    }
}

/// Marks the session closed when the receive task ends, including by
/// unwinding.
struct ShutdownGuard(watch::Sender<bool>);

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        self.0.send_replace(true);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{DialRotateEvent, TouchTapEvent};
    use crate::transport::split;
    use tokio::io::{duplex, DuplexStream};
    use tokio::sync::mpsc;
    use tokio_tungstenite::tungstenite::protocol::Role;
    use tokio_tungstenite::WebSocketStream;

    /// A plugin wired to an in-memory host.
    async fn plugin_with_host(
        registry: HandlerRegistry,
    ) -> (Plugin, WsWriter<DuplexStream>, WsReader<DuplexStream>) {
        let (a, b) = duplex(64 * 1024);
        let client = WebSocketStream::from_raw_socket(a, Role::Client, None).await;
        let host = WebSocketStream::from_raw_socket(b, Role::Server, None).await;
        let (writer, reader) = split(client);
        let (host_writer, host_reader) = split(host);

        let plugin = Plugin::spawn(
            "plugin-uuid".to_string(),
            Info::default(),
            reader,
            writer,
            registry,
            WriterConfig::default(),
        );
        (plugin, host_writer, host_reader)
    }

    #[test]
    fn test_builder_default() {
        let builder = PluginBuilder::default();
        assert!(builder.registry.is_empty());
        assert_eq!(builder.config.host, DEFAULT_HOST);
        assert_eq!(builder.config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
    }

    #[test]
    fn test_builder_method_chaining() {
        let builder = Plugin::builder()
            .handle("com.x.press/touchTap", |_e: TouchTapEvent, _ctx| async { Ok(()) })
            .handle("com.x.press/dialRotate", |_e: DialRotateEvent, _ctx| async { Ok(()) })
            .host("127.0.0.1")
            .connect_timeout(Duration::from_secs(5))
            .channel_capacity(16);

        assert!(builder.registry.contains("com.x.press/touchTap"));
        assert!(builder.registry.contains("com.x.press/dialRotate"));
        assert_eq!(builder.config.host, "127.0.0.1");
        assert_eq!(builder.config.connect_timeout, Duration::from_secs(5));
        assert_eq!(builder.config.writer.channel_capacity, 16);
    }

    #[tokio::test]
    async fn test_dispatches_to_handler() {
        let registry = HandlerRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register("com.x.press/dialRotate", move |e: DialRotateEvent, ctx| {
            let tx = tx.clone();
            async move {
                tx.send((e.payload.ticks, ctx.context().to_string())).unwrap();
                Ok(())
            }
        });

        let (_plugin, mut host, _host_reader) = plugin_with_host(registry).await;
        host.send_text(
            r#"{"event":"dialRotate","action":"com.x.press","context":"c1","device":"d1","payload":{"ticks":3}}"#
                .to_string(),
        )
        .await
        .unwrap();

        assert_eq!(rx.recv().await.unwrap(), (3, "c1".to_string()));
    }

    #[tokio::test]
    async fn test_bad_frames_do_not_stop_loop() {
        let registry = HandlerRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register("com.x.press/touchTap", move |e: TouchTapEvent, _ctx| {
            let tx = tx.clone();
            async move {
                tx.send(e.payload.coordinates.column).unwrap();
                Ok(())
            }
        });

        let (plugin, mut host, _host_reader) = plugin_with_host(registry).await;
        for frame in [
            "not json",
            r#"{"event":42}"#,
            r#"{"event":"unknownFutureEvent"}"#,
            r#"{"event":"touchTap","payload":{}}"#,
            r#"{"event":"touchTap","action":"com.x.other","payload":{}}"#,
            r#"{"event":"touchTap","action":"com.x.press","payload":{"coordinates":{"column":1,"row":0}}}"#,
        ] {
            host.send_text(frame.to_string()).await.unwrap();
        }

        assert_eq!(rx.recv().await.unwrap(), 1);
        assert!(plugin.is_running());
    }

    #[tokio::test]
    async fn test_handler_sends_feedback() {
        let registry = HandlerRegistry::new();
        registry.register("com.x.volume/dialRotate", |e: DialRotateEvent, ctx| async move {
            let mut payload = HashMap::new();
            payload.insert("value".to_string(), e.payload.ticks.to_string());
            ctx.set_feedback(payload).await
        });

        let (_plugin, mut host, mut host_reader) = plugin_with_host(registry).await;
        host.send_text(
            r#"{"event":"dialRotate","action":"com.x.volume","context":"ctx-7","payload":{"ticks":-2}}"#
                .to_string(),
        )
        .await
        .unwrap();

        let frame = host_reader.recv().await.unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&frame).unwrap();
        assert_eq!(parsed["event"], "setFeedback");
        assert_eq!(parsed["context"], "ctx-7");
        assert_eq!(parsed["payload"]["value"], "-2");
    }

    #[tokio::test]
    async fn test_register_while_running() {
        let (plugin, mut host, _host_reader) = plugin_with_host(HandlerRegistry::new()).await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        plugin.handle("com.x.late/willAppear", move |e: crate::event::WillAppearEvent, _ctx| {
            let tx = tx.clone();
            async move {
                tx.send(e.payload.state).unwrap();
                Ok(())
            }
        });

        host.send_text(
            r#"{"event":"willAppear","action":"com.x.late","payload":{"state":1}}"#.to_string(),
        )
        .await
        .unwrap();

        assert_eq!(rx.recv().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_set_feedback_from_plugin() {
        let (plugin, _host, mut host_reader) = plugin_with_host(HandlerRegistry::new()).await;

        plugin.set_feedback("ctx-1", HashMap::new()).await.unwrap();

        let frame = host_reader.recv().await.unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&frame).unwrap();
        assert_eq!(parsed["event"], "setFeedback");
        assert_eq!(parsed["context"], "ctx-1");
        assert!(parsed["payload"].as_object().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_on_close() {
        let (plugin, mut host, _host_reader) = plugin_with_host(HandlerRegistry::new()).await;
        assert_eq!(plugin.uuid(), "plugin-uuid");

        host.close().await.unwrap();

        tokio::time::timeout(Duration::from_secs(5), plugin.wait_for_shutdown())
            .await
            .unwrap();
        assert!(!plugin.is_running());
    }

    #[tokio::test]
    async fn test_write_after_shutdown_fails() {
        let (plugin, mut host, _host_reader) = plugin_with_host(HandlerRegistry::new()).await;

        host.close().await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), plugin.wait_for_shutdown())
            .await
            .unwrap();

        for _ in 0..2 {
            let result = plugin.set_feedback("c", HashMap::new()).await;
            assert!(matches!(result, Err(DeckwireError::ConnectionClosed)));
        }
    }

    #[tokio::test]
    async fn test_handler_panic_does_not_stop_loop() {
        let registry = HandlerRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register("com.x.press/dialRotate", move |e: DialRotateEvent, _ctx| {
            if e.payload.ticks == 0 {
                panic!("zero ticks");
            }
            let tx = tx.clone();
            async move {
                tx.send(e.payload.ticks).unwrap();
                Ok(())
            }
        });

        let (plugin, mut host, _host_reader) = plugin_with_host(registry).await;
        for ticks in [0, 5] {
            host.send_text(format!(
                r#"{{"event":"dialRotate","action":"com.x.press","payload":{{"ticks":{}}}}}"#,
                ticks
            ))
            .await
            .unwrap();
        }

        let delivered = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap();
        assert_eq!(delivered, Some(5));
        assert!(plugin.is_running());
    }

    #[test]
    fn test_shutdown_guard_marks_closed_on_unwind() {
        let (tx, rx) = watch::channel(false);
        let result = std::panic::catch_unwind(AssertUnwindSafe(move || {
            let _guard = ShutdownGuard(tx);
            panic!("receive task died");
        }));

        assert!(result.is_err());
        assert!(*rx.borrow());
    }
}
