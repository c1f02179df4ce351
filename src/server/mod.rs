/// NetPC server: session state and command handlers

/// Command dispatcher
pub mod dispatcher;
/// Directory and image listings
pub mod listing;
/// Mount and change directory
pub mod mount;
/// Sector transfers
pub mod sector;
/// Per-connection state
pub mod session;

pub use dispatcher::{Server, Shutdown};
pub use session::Session;
