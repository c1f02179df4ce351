/// Sector transfer handlers (`S` and `R` commands)

use crate::error::{FlexError, Result};
use crate::filesystem::HostFs;
use crate::format::{ACK, NAK, SECTOR_SIZE};
use crate::protocol::{decode_frame, encode_frame, Channel, FRAME_SIZE};
use crate::server::Session;
use log::{debug, log_enabled, warn, Level};
use std::io::{Read, Write};

/// Trailing byte sent after an all-zero frame when no disk is mounted
const NOT_READY_TRAILER: u8 = 0x01;

/// Handle a sector read request: send the sector to the client
///
/// Reads drive, track and sector, then sends 256 data bytes and the
/// checksum, then consumes the client's ACK/NAK. Unreadable sectors are
/// sent as zeros; with no disk mounted an all-zero frame plus a trailing
/// byte is sent so the client sees a checksum failure.
pub fn send_sector<F, R, W>(session: &mut Session<F>, channel: &mut Channel<R, W>) -> Result<()>
where
    F: HostFs,
    R: Read,
    W: Write,
{
    let mut address = [0u8; 3];
    channel.read_bytes(&mut address)?;
    let [drive, track, sector] = address;

    if !session.is_ready() {
        debug!("No disk mounted, forcing checksum error");
        channel.write_bytes(&[0u8; FRAME_SIZE])?;
        channel.write_byte(NOT_READY_TRAILER)?;
        let reply = channel.read_byte()?;
        if reply != NAK {
            debug!("{}", FlexError::protocol(format!("unexpected reply 0x{:02X} to a forced error", reply)));
        }
        return Ok(());
    }

    match session.read_sector(track, sector) {
        Ok(()) => debug!("Sector dsk {} [0x{:02X}/0x{:02X}] read", drive, track, sector),
        Err(e) => debug!(
            "Failed to read sector dsk {} [0x{:02X}/0x{:02X}]: {}",
            drive, track, sector, e
        ),
    }

    channel.write_bytes(&encode_frame(session.buffer()))?;

    match channel.read_byte()? {
        ACK => debug!("... transmission OK"),
        NAK => debug!("... transmission failed"),
        other => debug!("{}", FlexError::protocol(format!("unexpected reply 0x{:02X} to a sector", other))),
    }
    Ok(())
}

/// Handle a sector write request: receive a sector from the client
///
/// Reads drive, track, sector, 256 data bytes and the checksum. The sector
/// is written only if the checksum matches, the address is valid and a
/// writable disk is mounted. Returns whether the write happened; the caller
/// sends the ACK or NAK.
pub fn receive_sector<F, R, W>(session: &mut Session<F>, channel: &mut Channel<R, W>) -> Result<bool>
where
    F: HostFs,
    R: Read,
    W: Write,
{
    let mut address = [0u8; 3];
    channel.read_bytes(&mut address)?;
    let [_drive, track, sector] = address;

    let mut frame = [0u8; FRAME_SIZE];
    channel.read_bytes(&mut frame)?;

    let result = decode_frame(&frame).and_then(|payload| {
        session.buffer = payload;
        session.write_sector(track, sector)
    });

    match result {
        Ok(()) => {
            debug!("Sector [0x{:02X}/0x{:02X}] written", track, sector);
            Ok(true)
        }
        Err(e @ FlexError::ChecksumMismatch { .. }) => {
            warn!("{}", e);
            if log_enabled!(Level::Debug) {
                debug!("Payload:\n{}", hex_dump(&frame[..SECTOR_SIZE]));
            }
            Ok(false)
        }
        Err(e) => {
            debug!("Failed to write sector [0x{:02X}/0x{:02X}]: {}", track, sector, e);
            Ok(false)
        }
    }
}

/// Format a buffer as rows of 16 hex bytes
fn hex_dump(data: &[u8]) -> String {
    data.chunks(16)
        .map(|row| {
            row.iter()
                .map(|b| format!("0x{:02x}", b))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::LocalFs;
    use crate::image::FlexImageBuilder;
    use crate::protocol::checksum;
    use std::io::Cursor;
    use tempfile::{tempdir, TempDir};

    fn mounted_session() -> (TempDir, Session<LocalFs>) {
        let dir = tempdir().unwrap();
        FlexImageBuilder::new().save(dir.path().join("TEST.DSK")).unwrap();
        let mut session = Session::new(LocalFs::new(dir.path()).unwrap());
        session.mount("TEST").unwrap();
        (dir, session)
    }

    fn channel(input: Vec<u8>) -> Channel<Cursor<Vec<u8>>, Vec<u8>> {
        Channel::new(Cursor::new(input), Vec::new())
    }

    fn write_request(track: u8, sector: u8, data: &[u8; SECTOR_SIZE], sum: u16) -> Vec<u8> {
        let mut input = vec![0, track, sector];
        input.extend_from_slice(data);
        input.extend_from_slice(&sum.to_be_bytes());
        input
    }

    #[test]
    fn test_send_not_ready() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(LocalFs::new(dir.path()).unwrap());
        let mut ch = channel(vec![0, 1, 1, NAK]);

        send_sector(&mut session, &mut ch).unwrap();
        let out = ch.into_writer().unwrap();
        assert_eq!(out.len(), FRAME_SIZE + 1);
        assert!(out[..FRAME_SIZE].iter().all(|&b| b == 0));
        assert_eq!(out[FRAME_SIZE], NOT_READY_TRAILER);
    }

    #[test]
    fn test_send_sir() {
        let (_dir, mut session) = mounted_session();
        let mut ch = channel(vec![0, 0, 3, ACK]);

        send_sector(&mut session, &mut ch).unwrap();
        let out = ch.into_writer().unwrap();
        assert_eq!(out.len(), FRAME_SIZE);
        assert_eq!(&out[0x10..0x17], b"FLEXNET");
        let mut sector = [0u8; SECTOR_SIZE];
        sector.copy_from_slice(&out[..SECTOR_SIZE]);
        assert_eq!(&out[SECTOR_SIZE..], &checksum(&sector).to_be_bytes());
    }

    #[test]
    fn test_send_invalid_address_is_zeros() {
        let (_dir, mut session) = mounted_session();
        let mut ch = channel(vec![0, 99, 1, NAK]);

        send_sector(&mut session, &mut ch).unwrap();
        let out = ch.into_writer().unwrap();
        assert_eq!(out, vec![0u8; FRAME_SIZE]);
    }

    #[test]
    fn test_receive_good_sector() {
        let (_dir, mut session) = mounted_session();
        let data = [0x42u8; SECTOR_SIZE];
        let mut ch = channel(write_request(4, 2, &data, checksum(&data)));

        assert!(receive_sector(&mut session, &mut ch).unwrap());

        let mut read = channel(vec![0, 4, 2, ACK]);
        send_sector(&mut session, &mut read).unwrap();
        assert_eq!(&read.into_writer().unwrap()[..SECTOR_SIZE], &data[..]);
    }

    #[test]
    fn test_receive_bad_checksum() {
        let (_dir, mut session) = mounted_session();
        let data = [0x42u8; SECTOR_SIZE];
        let mut ch = channel(write_request(4, 2, &data, checksum(&data) + 1));

        assert!(!receive_sector(&mut session, &mut ch).unwrap());

        let mut read = channel(vec![0, 4, 2, ACK]);
        send_sector(&mut session, &mut read).unwrap();
        assert_eq!(&read.into_writer().unwrap()[2..SECTOR_SIZE], &[0u8; SECTOR_SIZE - 2][..]);
    }

    #[test]
    fn test_receive_invalid_address() {
        let (_dir, mut session) = mounted_session();
        let data = [1u8; SECTOR_SIZE];
        let mut ch = channel(write_request(7, 0, &data, checksum(&data)));
        assert!(!receive_sector(&mut session, &mut ch).unwrap());
    }

    #[test]
    fn test_receive_not_ready() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(LocalFs::new(dir.path()).unwrap());
        let data = [1u8; SECTOR_SIZE];
        let mut ch = channel(write_request(1, 1, &data, checksum(&data)));
        assert!(!receive_sector(&mut session, &mut ch).unwrap());
    }

    #[test]
    fn test_receive_truncated_request_disconnects() {
        let (_dir, mut session) = mounted_session();
        let mut ch = channel(vec![0, 1, 1, 0x42, 0x42]);
        assert!(matches!(
            receive_sector(&mut session, &mut ch),
            Err(FlexError::Disconnected)
        ));
    }

    #[test]
    fn test_hex_dump_rows() {
        let dump = hex_dump(&[0u8; 32]);
        assert_eq!(dump.lines().count(), 2);
        assert!(dump.starts_with("0x00 0x00"));
    }
}
