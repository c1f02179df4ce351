/// Flow-controlled directory listings (`A` and `I` commands)

use crate::error::{FlexError, Result};
use crate::filesystem::HostFs;
use crate::format::{has_prefix_ignore_case, is_image_name, ACK, CONTINUE, CR, ESC, LF};
use crate::protocol::Channel;
use crate::server::Session;
use log::{debug, warn};
use std::io::{Read, Write};

/// List disk images in the working directory whose names start with the
/// parameter (case-insensitive)
pub fn list_images<F, R, W>(session: &Session<F>, channel: &mut Channel<R, W>) -> Result<()>
where
    F: HostFs,
    R: Read,
    W: Write,
{
    let prefix = channel.read_param()?;
    debug!("RDIR({}) command", prefix);

    channel.write_bytes(&[CR, LF])?;

    let names = entries(session)
        .into_iter()
        .filter(|name| is_image_name(name) && has_prefix_ignore_case(name, &prefix));

    stream_entries(channel, names)
}

/// List subdirectories of the working directory
///
/// The parameter is read and ignored. The client must then send a space
/// before the start marker goes out; any other byte suppresses the marker
/// but the listing carries on.
pub fn list_directories<F, R, W>(session: &Session<F>, channel: &mut Channel<R, W>) -> Result<()>
where
    F: HostFs,
    R: Read,
    W: Write,
{
    debug!("RLIST command");
    let _ = channel.read_param()?;

    let ready = channel.read_byte()?;
    if ready != CONTINUE {
        warn!(
            "{}",
            FlexError::protocol(format!("bad char 0x{:02X} received before directory listing", ready))
        );
    } else {
        channel.write_bytes(&[CR, LF])?;
    }

    let names = entries(session).into_iter().filter(|name| {
        if name == "." || name == ".." {
            return false;
        }
        match session.fs.is_dir(name) {
            Ok(is_dir) => is_dir,
            Err(e) => {
                debug!("{}: {}", name, e);
                false
            }
        }
    });

    stream_entries(channel, names)
}

fn entries<F: HostFs>(session: &Session<F>) -> Vec<String> {
    session.fs.entries().unwrap_or_else(|e| {
        warn!("Cannot read directory {}: {}", session.cwd(), e);
        Vec::new()
    })
}

fn unexpected_token(byte: u8) -> FlexError {
    FlexError::protocol(format!("unexpected command (0x{:02X}) while reading directory", byte))
}

/// Send one entry per continue token from the client, each followed by CR LF
///
/// ESC or any other byte in place of a token ends the listing early. After
/// the last entry one more token is read. An ACK closes the listing in
/// every case.
fn stream_entries<R, W, I>(channel: &mut Channel<R, W>, names: I) -> Result<()>
where
    R: Read,
    W: Write,
    I: Iterator<Item = String>,
{
    let mut completed = true;

    for name in names {
        let reply = channel.read_byte()?;
        if reply != CONTINUE {
            if reply == ESC {
                debug!("Listing aborted by client");
            } else {
                warn!("{}", unexpected_token(reply));
            }
            completed = false;
            break;
        }
        debug!("---> {}", name);
        channel.write_bytes(name.as_bytes())?;
        channel.write_bytes(&[CR, LF])?;
    }

    if completed {
        let reply = channel.read_byte()?;
        if reply != CONTINUE {
            warn!("{}", unexpected_token(reply));
        }
    }

    channel.write_byte(ACK)
}
