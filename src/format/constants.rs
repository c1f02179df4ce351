/// Flex disk layout and NetPC wire constants

/// Flex sector size in bytes (always 256)
pub const SECTOR_SIZE: usize = 256;

/// Linear block holding the System Information Record
pub const SIR_BLOCK: u64 = 2;

/// Offset of the 11-byte volume label in the SIR
pub const SIR_LABEL_OFFSET: usize = 0x10;

/// Length of a Flex name field (8 name bytes + 3 extension bytes)
pub const NAME_FIELD_LEN: usize = 11;

/// Length of the base-name part of a name field
pub const NAME_BASE_LEN: usize = 8;

/// Offset of the big-endian volume number in the SIR
pub const SIR_VOLUME_OFFSET: usize = 0x1B;

/// Offset of the first free track/sector pair in the SIR
pub const SIR_FIRST_FREE_OFFSET: usize = 0x1D;

/// Offset of the last free track/sector pair in the SIR
pub const SIR_LAST_FREE_OFFSET: usize = 0x1F;

/// Offset of the big-endian free sector count in the SIR
pub const SIR_FREE_OFFSET: usize = 0x21;

/// Offset of the creation date (month, day, year) in the SIR
pub const SIR_DATE_OFFSET: usize = 0x23;

/// Offset of the highest track index in the SIR
pub const SIR_TRACKS_OFFSET: usize = 0x26;

/// Offset of the sectors-per-track count in the SIR
pub const SIR_SECTORS_OFFSET: usize = 0x27;

/// First sector of the directory chain on track 0
pub const DIR_FIRST_SECTOR: u8 = 5;

/// Line feed
pub const LF: u8 = 0x0A;

/// Carriage return, parameter terminator
pub const CR: u8 = 0x0D;

/// Positive acknowledge
pub const ACK: u8 = 0x06;

/// Negative acknowledge
pub const NAK: u8 = 0x15;

/// Escape, aborts a listing
pub const ESC: u8 = 0x1B;

/// Continue token sent by the client for each listing entry
pub const CONTINUE: u8 = b' ';

/// First synchronization byte
pub const SYNC_1: u8 = 0x55;

/// Second synchronization byte (also used for RESYNC)
pub const SYNC_2: u8 = 0xAA;

/// Maximum number of parameter bytes kept (the rest is dropped)
pub const MAX_PARAM_LEN: usize = 127;

/// Disk image extension appended on mount (uppercase is tried first)
pub const IMAGE_EXTENSION: &str = "DSK";
