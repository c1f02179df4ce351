/// Sector checksum and wire framing

use crate::error::{FlexError, Result};
use crate::format::{SectorBuf, SECTOR_SIZE};

/// Size of a sector frame on the wire: payload plus two checksum bytes
pub const FRAME_SIZE: usize = SECTOR_SIZE + 2;

/// Additive checksum of a sector, truncated to 16 bits
pub fn checksum(sector: &SectorBuf) -> u16 {
    sector
        .iter()
        .fold(0u16, |sum, &byte| sum.wrapping_add(byte as u16))
}

/// Encode a sector as payload + checksum MSB + checksum LSB
pub fn encode_frame(sector: &SectorBuf) -> [u8; FRAME_SIZE] {
    let mut frame = [0u8; FRAME_SIZE];
    frame[..SECTOR_SIZE].copy_from_slice(sector);
    frame[SECTOR_SIZE..].copy_from_slice(&checksum(sector).to_be_bytes());
    frame
}

/// Split a received frame and verify its checksum
///
/// The checksum is recomputed over the payload and compared with the
/// transmitted bytes before the payload is handed back.
pub fn decode_frame(frame: &[u8; FRAME_SIZE]) -> Result<SectorBuf> {
    let mut sector = [0u8; SECTOR_SIZE];
    sector.copy_from_slice(&frame[..SECTOR_SIZE]);
    verify(&sector, u16::from_be_bytes([frame[SECTOR_SIZE], frame[SECTOR_SIZE + 1]]))?;
    Ok(sector)
}

/// Compare a transmitted checksum with the one computed over `sector`
pub fn verify(sector: &SectorBuf, received: u16) -> Result<()> {
    let computed = checksum(sector);
    if computed != received {
        return Err(FlexError::ChecksumMismatch { received, computed });
    }
    Ok(())
}
