//! Command surface for the recall index: a CLI with one-shot subcommands
//! and a line-delimited JSON serve mode.

pub mod context;
pub mod protocol;
pub mod server;

pub use context::RecallContext;
pub use protocol::{Request, Response};
pub use server::CommandServer;
