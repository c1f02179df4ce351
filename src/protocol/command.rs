/// NetPC command table

/// A command byte received from the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Synchronization byte (0x55 or 0xAA), echoed back
    Sync(u8),
    /// Send a sector to the client (`S`/`s`)
    SendSector,
    /// Receive a sector from the client (`R`/`r`)
    ReceiveSector,
    /// Query or change the MS-DOS drive (`V`), ignored
    QueryDrive,
    /// Query the current directory (`?`)
    QueryDirectory,
    /// Quick drive ready check (`Q`)
    ReadyCheck,
    /// List disk images (`A`, RDIR)
    ListImages,
    /// List subdirectories (`I`, RLIST)
    ListDirectories,
    /// Create a disk image (`C`, RCREATE), not implemented
    Create,
    /// Delete a disk image (`D`, RDELETE), not implemented
    Delete,
    /// Exit the server (`E`, REXIT)
    Exit,
    /// Change directory (`P`, RCD)
    ChangeDirectory,
    /// Mount a disk image (`M`, RMOUNT)
    Mount,
    /// Anything else, ignored
    Unknown(u8),
}

impl From<u8> for Command {
    fn from(value: u8) -> Self {
        match value {
            0x55 | 0xAA => Command::Sync(value),
            b'S' | b's' => Command::SendSector,
            b'R' | b'r' => Command::ReceiveSector,
            b'V' => Command::QueryDrive,
            b'?' => Command::QueryDirectory,
            b'Q' => Command::ReadyCheck,
            b'A' => Command::ListImages,
            b'I' => Command::ListDirectories,
            b'C' => Command::Create,
            b'D' => Command::Delete,
            b'E' => Command::Exit,
            b'P' => Command::ChangeDirectory,
            b'M' => Command::Mount,
            other => Command::Unknown(other),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Sync(byte) => write!(f, "SYNC(${:02X})", byte),
            Command::SendSector => write!(f, "READ SECTOR"),
            Command::ReceiveSector => write!(f, "WRITE SECTOR"),
            Command::QueryDrive => write!(f, "DRIVE"),
            Command::QueryDirectory => write!(f, "PWD"),
            Command::ReadyCheck => write!(f, "READY"),
            Command::ListImages => write!(f, "RDIR"),
            Command::ListDirectories => write!(f, "RLIST"),
            Command::Create => write!(f, "RCREATE"),
            Command::Delete => write!(f, "RDELETE"),
            Command::Exit => write!(f, "REXIT"),
            Command::ChangeDirectory => write!(f, "RCD"),
            Command::Mount => write!(f, "RMOUNT"),
            Command::Unknown(byte) => {
                let c = if byte.is_ascii_graphic() { *byte as char } else { '?' };
                write!(f, "UNKNOWN(0x{:02X} '{}')", byte, c)
            }
        }
    }
}
