/// Command dispatcher: the NetPC server loop

use crate::error::Result;
use crate::filesystem::HostFs;
use crate::format::{ACK, CR, NAK};
use crate::protocol::{Channel, Command};
use crate::server::listing::{list_directories, list_images};
use crate::server::sector::{receive_sector, send_sector};
use crate::server::Session;
use log::{debug, error, info};
use std::io::{Read, Write};

/// Why the server loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// The client sent the exit command
    Exit,
    /// The transport reached end of stream
    Disconnected,
}

impl Shutdown {
    /// Process exit status for this shutdown
    pub fn exit_code(&self) -> u8 {
        match self {
            Shutdown::Exit => 0,
            Shutdown::Disconnected => 1,
        }
    }
}

/// A NetPC server bound to one client connection
///
/// Commands are handled strictly one at a time: a command byte is read,
/// its handler runs to completion, then the next byte is read.
pub struct Server<F: HostFs, R: Read, W: Write> {
    session: Session<F>,
    channel: Channel<R, W>,
}

impl<F: HostFs, R: Read, W: Write> Server<F, R, W> {
    /// Create a server from a session and a channel to the client
    pub fn new(session: Session<F>, channel: Channel<R, W>) -> Self {
        Self { session, channel }
    }

    /// Session state
    pub fn session(&self) -> &Session<F> {
        &self.session
    }

    /// Take the server apart
    pub fn into_parts(self) -> (Session<F>, Channel<R, W>) {
        (self.session, self.channel)
    }

    /// Serve commands until the client exits or the link drops
    ///
    /// Only a failure to write to the transport is returned as an error.
    pub fn serve(&mut self) -> Result<Shutdown> {
        loop {
            match self.step() {
                Ok(None) => {}
                Ok(Some(shutdown)) => return Ok(shutdown),
                Err(e) if e.is_disconnect() => {
                    error!("Serial line disappeared");
                    self.session.unmount();
                    return Ok(Shutdown::Disconnected);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Read and handle a single command
    pub fn step(&mut self) -> Result<Option<Shutdown>> {
        let command = Command::from(self.channel.read_byte()?);
        debug!("{} command", command);

        let session = &mut self.session;
        let channel = &mut self.channel;

        match command {
            Command::Sync(byte) => {
                channel.write_byte(byte)?;
            }
            Command::SendSector => send_sector(session, channel)?,
            Command::ReceiveSector => {
                let written = receive_sector(session, channel)?;
                channel.write_byte(if written { ACK } else { NAK })?;
            }
            Command::QueryDrive => {
                let _ = channel.read_param()?;
                channel.write_byte(ACK)?;
            }
            Command::QueryDirectory => {
                debug!("Current directory is {}", session.cwd());
                channel.write_bytes(session.cwd().as_bytes())?;
                channel.write_byte(CR)?;
                channel.write_byte(ACK)?;
            }
            Command::ReadyCheck => {
                channel.write_byte(ACK)?;
            }
            Command::ListImages => list_images(session, channel)?,
            Command::ListDirectories => list_directories(session, channel)?,
            Command::Create => {
                // Name, track count, sector count, options
                for _ in 0..4 {
                    let _ = channel.read_param()?;
                }
                debug!("RCREATE not implemented, replying NAK");
                channel.write_byte(NAK)?;
            }
            Command::Delete => {
                let name = channel.read_param()?;
                debug!("RDELETE({}) not implemented, replying NAK", name);
                channel.write_byte(NAK)?;
            }
            Command::Exit => {
                channel.write_byte(ACK)?;
                channel.flush()?;
                info!("Flexnet exit");
                session.unmount();
                return Ok(Some(Shutdown::Exit));
            }
            Command::ChangeDirectory => {
                let path = channel.read_param()?;
                let ok = session.change_directory(&path).is_ok();
                channel.write_byte(if ok { ACK } else { NAK })?;
            }
            Command::Mount => {
                let name = channel.read_param()?;
                match session.mount(&name) {
                    Ok(image) => {
                        let mode = if image.is_read_only() { b'R' } else { b'W' };
                        channel.write_byte(ACK)?;
                        channel.write_byte(mode)?;
                    }
                    Err(e) => {
                        debug!("Cannot mount {}: {}", name, e);
                        channel.write_byte(NAK)?;
                    }
                }
            }
            Command::Unknown(_) => {}
        }

        Ok(None)
    }
}
