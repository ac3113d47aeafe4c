//! Control module - everything exchanged before events flow.
//!
//! # Workflow
//!
//! 1. Host spawns the plugin with `-port`, `-pluginUUID`, `-registerEvent`
//!    and `-info`
//! 2. Plugin parses [`LaunchArgs`] and the [`Info`] document
//! 3. Plugin connects to `ws://localhost:<port>`
//! 4. Plugin sends the [`RegisterMessage`]
//! 5. Host starts pushing events
//!
//! # Example
//!
//! ```ignore
//! use deckwire_client::control::{build_register_message, LaunchArgs};
//!
//! let args = LaunchArgs::from_env()?;
//! let info = args.parse_info()?;
//! let register = build_register_message(&args)?;
//! ```

mod args;
mod info;
mod register;

pub use args::LaunchArgs;
pub use info::{ApplicationInfo, Colors, DeviceInfo, DeviceSize, Info, PluginInfo};
pub use register::{build_register_message, RegisterMessage};
