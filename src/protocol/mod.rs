/// NetPC wire protocol: framing, commands and the byte channel

/// Blocking byte channel
pub mod channel;
/// Command table
pub mod command;
/// Checksum and sector framing
pub mod frame;

pub use channel::Channel;
pub use command::Command;
pub use frame::{checksum, decode_frame, encode_frame, verify, FRAME_SIZE};
