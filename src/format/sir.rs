/// System Information Record parsing

use crate::error::{FlexError, Result};
use crate::format::constants::*;
use crate::format::name::format_name;

/// Flex System Information Record (linear sector 2 of an image)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfoRecord {
    /// Volume label (no separator, NULs dropped)
    pub label: String,
    /// Volume number
    pub volume_number: u16,
    /// Number of free sectors
    pub free_sectors: u16,
    /// Highest track index
    pub max_track: u8,
    /// Sectors per track
    pub sectors_per_track: u8,
}

impl SystemInfoRecord {
    /// Parse and validate a SIR sector
    ///
    /// Fails if the label field has bytes outside the Flex name charset or
    /// if either geometry byte is zero.
    pub fn parse(sector: &[u8; SECTOR_SIZE]) -> Result<Self> {
        let mut field = [0u8; NAME_FIELD_LEN];
        field.copy_from_slice(&sector[SIR_LABEL_OFFSET..SIR_LABEL_OFFSET + NAME_FIELD_LEN]);

        let label = format_name(&field, false)
            .map_err(|e| FlexError::not_flex(format!("volume label: {}", e)))?;

        let max_track = sector[SIR_TRACKS_OFFSET];
        let sectors_per_track = sector[SIR_SECTORS_OFFSET];
        if max_track == 0 || sectors_per_track == 0 {
            return Err(FlexError::not_flex(format!(
                "geometry {} tracks / {} sectors",
                max_track, sectors_per_track
            )));
        }

        Ok(Self {
            label,
            volume_number: u16::from_be_bytes([
                sector[SIR_VOLUME_OFFSET],
                sector[SIR_VOLUME_OFFSET + 1],
            ]),
            free_sectors: u16::from_be_bytes([sector[SIR_FREE_OFFSET], sector[SIR_FREE_OFFSET + 1]]),
            max_track,
            sectors_per_track,
        })
    }

    /// Write this record into a SIR sector
    pub fn write_to(&self, sector: &mut [u8; SECTOR_SIZE]) {
        let label = self.label.as_bytes();
        let field = &mut sector[SIR_LABEL_OFFSET..SIR_LABEL_OFFSET + NAME_FIELD_LEN];
        field.fill(0);
        let len = label.len().min(NAME_FIELD_LEN);
        field[..len].copy_from_slice(&label[..len]);

        sector[SIR_VOLUME_OFFSET..SIR_VOLUME_OFFSET + 2]
            .copy_from_slice(&self.volume_number.to_be_bytes());
        sector[SIR_FREE_OFFSET..SIR_FREE_OFFSET + 2]
            .copy_from_slice(&self.free_sectors.to_be_bytes());
        sector[SIR_TRACKS_OFFSET] = self.max_track;
        sector[SIR_SECTORS_OFFSET] = self.sectors_per_track;
    }

    /// Number of data sectors the SIR describes (excluding track 0)
    pub fn data_sectors(&self) -> u32 {
        self.max_track as u32 * self.sectors_per_track as u32
    }
}
