use thiserror::Error;

/// Result type alias for Flex disk and protocol operations
pub type Result<T> = std::result::Result<T, FlexError>;

/// Errors that can occur while serving Flex disk images
#[derive(Debug, Error)]
pub enum FlexError {
    /// I/O error occurred while opening, seeking, reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image is not a Flex disk (bad SIR name field or zero geometry)
    #[error("Not a valid Flex disk image: {0}")]
    NotFlexFormat(String),

    /// The image size is not a whole number of sectors
    #[error("Disk size doesn't match an integer number of sectors: {size} bytes ({} left over)", .size % 256)]
    SizeMismatch {
        /// Image size in bytes
        size: u64,
    },

    /// The image is too small for the geometry its SIR claims
    #[error("Disk image too small for {tracks} tracks of {sectors} sectors ({observed} sectors found, ~{estimated_tracks} usable tracks): unusual geometry or truncated")]
    Geometry {
        /// Highest track index from the SIR
        tracks: u8,
        /// Sectors per track from the SIR
        sectors: u8,
        /// Sectors actually present in the file
        observed: u64,
        /// Estimated highest track index the file could hold
        estimated_tracks: i64,
    },

    /// Invalid bytes in an 11-byte name field
    #[error("Invalid name field: {0}")]
    InvalidName(String),

    /// Track/sector address outside the disk geometry
    #[error("Invalid address: track {track}, sector {sector}")]
    InvalidAddress {
        /// Track number
        track: u8,
        /// Sector number
        sector: u8,
    },

    /// Write attempted on a read-only image
    #[error("Disk image is read-only")]
    ReadOnly,

    /// No disk image is mounted
    #[error("No disk mounted")]
    NotReady,

    /// Received sector checksum did not match its payload
    #[error("Bad checksum (0x{received:04X} instead of 0x{computed:04X})")]
    ChecksumMismatch {
        /// Checksum sent by the client
        received: u16,
        /// Checksum computed over the payload
        computed: u16,
    },

    /// End of stream on the transport
    #[error("Serial line disappeared")]
    Disconnected,

    /// Unexpected byte during a protocol handshake
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl FlexError {
    /// Create a not-a-Flex-disk error
    pub fn not_flex<S: Into<String>>(message: S) -> Self {
        FlexError::NotFlexFormat(message.into())
    }

    /// Create an invalid name error
    pub fn invalid_name<S: Into<String>>(message: S) -> Self {
        FlexError::InvalidName(message.into())
    }

    /// Create a protocol error
    pub fn protocol<S: Into<String>>(message: S) -> Self {
        FlexError::Protocol(message.into())
    }

    /// True if the error means the transport is gone
    pub fn is_disconnect(&self) -> bool {
        matches!(self, FlexError::Disconnected)
    }
}
