/// Builder for creating blank Flex disk images

use crate::error::Result;
use crate::format::*;
use crate::image::Geometry;
use std::path::Path;

/// Builder for formatted, empty Flex disk images
///
/// The image gets a zeroed boot sector, a SIR, a linked directory chain on
/// track 0 and every sector of tracks 1 and up linked into the free chain.
#[derive(Debug, Clone)]
pub struct FlexImageBuilder {
    label: String,
    volume_number: u16,
    max_track: u8,
    sectors_per_track: u8,
    track0_sectors: Option<u8>,
    date: [u8; 3],
}

impl Default for FlexImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FlexImageBuilder {
    /// Create a builder for a 35 track, 10 sector single density disk
    pub fn new() -> Self {
        Self {
            label: "FLEXNET".to_string(),
            volume_number: 1,
            max_track: 34,
            sectors_per_track: 10,
            track0_sectors: None,
            date: [1, 1, 80],
        }
    }

    /// Set the volume label (up to 11 characters from the Flex name charset)
    pub fn label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into();
        self
    }

    /// Set the volume number
    pub fn volume_number(mut self, volume_number: u16) -> Self {
        self.volume_number = volume_number;
        self
    }

    /// Set the highest track index
    pub fn max_track(mut self, max_track: u8) -> Self {
        self.max_track = max_track;
        self
    }

    /// Set sectors per track
    pub fn sectors_per_track(mut self, sectors_per_track: u8) -> Self {
        self.sectors_per_track = sectors_per_track;
        self
    }

    /// Set the number of sectors on track 0 (defaults to a full track)
    pub fn track0_sectors(mut self, track0_sectors: u8) -> Self {
        self.track0_sectors = Some(track0_sectors);
        self
    }

    /// Set the creation date as month, day and two-digit year
    pub fn date(mut self, month: u8, day: u8, year: u8) -> Self {
        self.date = [month, day, year];
        self
    }

    /// Geometry of the image this builder produces
    pub fn geometry(&self) -> Geometry {
        Geometry::new(
            self.max_track as u16,
            self.sectors_per_track,
            self.track0_sectors.unwrap_or(self.sectors_per_track),
        )
    }

    /// Build the raw image bytes
    pub fn build(&self) -> Vec<u8> {
        let geometry = self.geometry();
        let mut data = vec![0u8; geometry.total_blocks() as usize * SECTOR_SIZE];

        let link = |data: &mut [u8], from: (u8, u8), to: (u8, u8)| {
            if let Some(block) = geometry.block_index(from.0, from.1) {
                let offset = block as usize * SECTOR_SIZE;
                data[offset] = to.0;
                data[offset + 1] = to.1;
            }
        };

        // Directory chain on track 0
        let track0 = geometry.track0_sectors;
        for sector in DIR_FIRST_SECTOR..=track0 {
            let next = if sector < track0 { (0, sector + 1) } else { (0, 0) };
            link(&mut data, (0, sector), next);
        }

        // Free chain over all data tracks
        for track in 1..=self.max_track {
            for sector in 1..=self.sectors_per_track {
                let next = if sector < self.sectors_per_track {
                    (track, sector + 1)
                } else if track < self.max_track {
                    (track + 1, 1)
                } else {
                    (0, 0)
                };
                link(&mut data, (track, sector), next);
            }
        }

        let free_sectors = (self.max_track as u32 * self.sectors_per_track as u32).min(u16::MAX as u32);
        let sir = SystemInfoRecord {
            label: self.label.clone(),
            volume_number: self.volume_number,
            free_sectors: free_sectors as u16,
            max_track: self.max_track,
            sectors_per_track: self.sectors_per_track,
        };

        let offset = SIR_BLOCK as usize * SECTOR_SIZE;
        if data.len() >= offset + SECTOR_SIZE {
            let mut sector = [0u8; SECTOR_SIZE];
            sir.write_to(&mut sector);
            if free_sectors > 0 {
                sector[SIR_FIRST_FREE_OFFSET] = 1;
                sector[SIR_FIRST_FREE_OFFSET + 1] = 1;
                sector[SIR_LAST_FREE_OFFSET] = self.max_track;
                sector[SIR_LAST_FREE_OFFSET + 1] = self.sectors_per_track;
            }
            sector[SIR_DATE_OFFSET..SIR_DATE_OFFSET + 3].copy_from_slice(&self.date);
            data[offset..offset + SECTOR_SIZE].copy_from_slice(&sector);
        }

        data
    }

    /// Build the image and write it to `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.build())?;
        Ok(())
    }
}
