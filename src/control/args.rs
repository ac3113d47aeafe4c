//! Launch arguments passed by the host.
//!
//! The host starts the plugin as
//!
//! ```text
//! plugin -port 28196 -pluginUUID 5A3B... -registerEvent registerPlugin -info '{...}'
//! ```
//!
//! Single-dash long flags are what the host sends; `--port` and
//! `-port=28196` are accepted too.

use std::ffi::OsString;

use clap::Parser;

use super::Info;
use crate::error::{DeckwireError, Result};

/// Flags the host always passes.
const HOST_FLAGS: [&str; 4] = ["port", "pluginUUID", "registerEvent", "info"];

/// Connection parameters handed over by the host at launch.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct LaunchArgs {
    /// Port of the host's local WebSocket server.
    #[arg(long = "port")]
    pub port: u16,

    /// Identity assigned to this plugin instance.
    #[arg(long = "pluginUUID")]
    pub plugin_uuid: String,

    /// Event name to register with.
    #[arg(long = "registerEvent")]
    pub register_event: String,

    /// JSON document describing the host application and devices.
    #[arg(long = "info")]
    pub info: String,
}

impl LaunchArgs {
    /// Parse the arguments of the current process.
    pub fn from_env() -> Result<Self> {
        Self::parse_args(std::env::args_os())
    }

    /// Parse an argument list. The first item is the program name.
    ///
    /// # Errors
    ///
    /// Returns [`DeckwireError::InvalidArgs`] if a flag is missing, unknown,
    /// or has an invalid value.
    pub fn parse_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args = args.into_iter().map(Into::into).enumerate().map(|(i, arg)| {
            if i == 0 {
                arg
            } else {
                normalize_flag(arg)
            }
        });
        Ok(Self::try_parse_from(args)?)
    }

    /// Parse the `-info` document.
    pub fn parse_info(&self) -> Result<Info> {
        serde_json::from_str(&self.info).map_err(DeckwireError::InvalidInfo)
    }
}

/// Rewrite `-flag` and `-flag=value` to their double-dash form for the
/// flags the host passes. Everything else is left untouched.
fn normalize_flag(arg: OsString) -> OsString {
    let Some(text) = arg.to_str() else {
        return arg;
    };
    let Some(rest) = text.strip_prefix('-') else {
        return arg;
    };
    if rest.starts_with('-') {
        return arg;
    }

    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    if HOST_FLAGS.contains(&name) {
        OsString::from(format!("-{}", text))
    } else {
        arg
    }
}
