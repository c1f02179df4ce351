/*!
# flexnet

A NetPC server for Flex systems: serves Flex disk image files to a
6800/6809 machine over a serial line.

## Features

- Opens Flex disk images and works out their geometry from the System
  Information Record and the file size, including double density disks
  with a single density track 0 and oversized EEPROM images
- Track/sector to block translation with the legacy track 0 aliasing
- The NetPC command set: sector read/write with checksums, image and
  directory listings, mount, change directory, sync and exit
- Per-connection session state over any `Read`/`Write` pair

## Quick Start

```rust,no_run
use flexnet::{Channel, LocalFs, Server, Session};
use std::fs::OpenOptions;

let line = OpenOptions::new().read(true).write(true).open("/dev/ttyUSB0")?;
let channel = Channel::new(line.try_clone()?, line);

let mut session = Session::new(LocalFs::from_process_dir()?);
session.load("FLEX09.DSK")?;

let mut server = Server::new(session, channel);
let shutdown = server.serve()?;
println!("Stopped: {:?}", shutdown);
# Ok::<(), flexnet::FlexError>(())
```

## Modules

- `format`: Flex on-disk and wire constants, name fields, the SIR
- `image`: disk images, geometry and a builder for blank images
- `protocol`: checksum framing, command table and the byte channel
- `filesystem`: host directory access
- `server`: session state and command handlers
- `config`: server configuration
- `error`: error types and Result alias
*/

#![warn(missing_docs)]

/// Server configuration
pub mod config;
/// Error types and Result alias
pub mod error;
/// Host filesystem access
pub mod filesystem;
/// Flex format constants, name fields and the SIR
pub mod format;
/// Disk images and geometry
pub mod image;
/// Wire protocol
pub mod protocol;
/// Server loop and command handlers
pub mod server;

// Re-export common types
pub use config::{ServerConfig, ServerConfigBuilder, Transport};
pub use error::{FlexError, Result};
pub use filesystem::{HostFs, LocalFs};
pub use format::{format_name, SectorBuf, SystemInfoRecord, SECTOR_SIZE};
pub use image::{DiskImage, FlexImageBuilder, Geometry, GeometryKind};
pub use protocol::{checksum, Channel, Command};
pub use server::{Server, Session, Shutdown};
