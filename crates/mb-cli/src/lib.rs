//! `mb`: schema import, relationship suggestions and code generation from
//! the command line
//!
//! The binary is a thin wrapper over [`run`]; everything else lives here so
//! it can be exercised without spawning a process.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

pub use cli::{Cli, Command, SchemaCommand};
pub use commands::{run, Status};
pub use config::CliConfig;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
