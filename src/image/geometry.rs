/// Track/sector geometry detection and block translation

use crate::error::{FlexError, Result};
use log::{debug, warn};

/// How the geometry of an image was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    /// Every track, track 0 included, has the same sector count
    SingleDensity,
    /// Double density disk with a shorter single density track 0
    DoubleDensity,
    /// Track 0 would be longer than a full track (seen on EEPROM images);
    /// a normal track 0 is assumed and an incomplete trailing track added
    Oversized {
        /// Sectors present on the incomplete trailing track
        trailing_sectors: i64,
    },
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryKind::SingleDensity => write!(f, "Single Density"),
            GeometryKind::DoubleDensity => write!(f, "Double Density"),
            GeometryKind::Oversized { trailing_sectors } => {
                write!(f, "Unknown ({} sector trailing track)", trailing_sectors)
            }
        }
    }
}

/// Disk geometry derived from the SIR and the image size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Highest valid track index
    pub max_track: u16,
    /// Sectors per full track
    pub sectors_per_track: u8,
    /// Sectors on track 0
    pub track0_sectors: u8,
    /// Classification that produced this geometry
    pub kind: GeometryKind,
}

impl Geometry {
    /// Build a geometry directly, without detection
    pub fn new(max_track: u16, sectors_per_track: u8, track0_sectors: u8) -> Self {
        let kind = if track0_sectors == sectors_per_track {
            GeometryKind::SingleDensity
        } else {
            GeometryKind::DoubleDensity
        };
        Self {
            max_track,
            sectors_per_track,
            track0_sectors,
            kind,
        }
    }

    /// Guess the geometry of an image holding `observed` sectors
    ///
    /// `max_track` and `sectors_per_track` come from the SIR. The rules are
    /// evaluated in a fixed order; the two double density branches overlap
    /// and are kept apart on purpose.
    pub fn detect(max_track: u8, sectors_per_track: u8, observed: u64) -> Result<Self> {
        let nbtrk = max_track as i64;
        let nbsec = sectors_per_track as i64;
        let observed_sectors = observed as i64;

        if (nbtrk + 1) * nbsec == observed_sectors {
            debug!("Looks like a Single Density disk");
            return Ok(Self {
                max_track: max_track as u16,
                sectors_per_track,
                track0_sectors: sectors_per_track,
                kind: GeometryKind::SingleDensity,
            });
        }

        let track0l = observed_sectors - nbtrk * nbsec;

        let (max_track, track0l, kind) = if (nbsec >= 36 && track0l == 20)
            || (nbsec == 18 && track0l == 10)
            || track0l == nbsec / 2
        {
            debug!(
                "Looks like a Double Density disk with Single Density track 0 of {} sectors",
                track0l
            );
            (nbtrk, track0l, GeometryKind::DoubleDensity)
        } else if track0l > nbsec {
            warn!(
                "Unknown geometry: {} tracks of {} sectors + first track of {} sectors",
                nbtrk, nbsec, track0l
            );
            let nbtrk = nbtrk + 1;
            let track0l = nbsec;
            let trailing_sectors = observed_sectors - (nbtrk - 1) * nbsec - track0l;
            warn!(
                "Using normal {} sector track 0, adding incomplete track {} of {} sectors",
                track0l, nbtrk, trailing_sectors
            );
            (nbtrk, track0l, GeometryKind::Oversized { trailing_sectors })
        } else if track0l > nbsec / 2 && track0l < nbsec {
            debug!(
                "Looks like a Double Density disk with Single Density track 0 of {} sectors",
                track0l
            );
            (nbtrk, track0l, GeometryKind::DoubleDensity)
        } else {
            return Err(Self::truncated(max_track, sectors_per_track, observed));
        };

        let track0_sectors = u8::try_from(track0l)
            .ok()
            .filter(|&sectors| sectors > 0)
            .ok_or_else(|| Self::truncated(nbtrk as u8, sectors_per_track, observed))?;

        Ok(Self {
            max_track: max_track as u16,
            sectors_per_track,
            track0_sectors,
            kind,
        })
    }

    fn truncated(max_track: u8, sectors_per_track: u8, observed: u64) -> FlexError {
        let nbtrk = max_track as i64;
        let nbsec = sectors_per_track as i64;
        let estimated_tracks = nbtrk - (((nbtrk * nbsec - observed as i64) / nbsec) + 1);
        FlexError::Geometry {
            tracks: max_track,
            sectors: sectors_per_track,
            observed,
            estimated_tracks,
        }
    }

    /// Translate a track/sector address to a linear block index
    ///
    /// Returns `None` for addresses outside the geometry. On track 0, sectors
    /// 0 (boot sector) and 1 both map to block 0.
    pub fn block_index(&self, track: u8, sector: u8) -> Option<u32> {
        if track as u16 > self.max_track
            || sector > self.sectors_per_track
            || (sector == 0 && track != 0)
        {
            return None;
        }

        if track == 0 {
            Some(sector.saturating_sub(1) as u32)
        } else {
            Some(
                self.track0_sectors as u32
                    + (track as u32 - 1) * self.sectors_per_track as u32
                    + sector as u32
                    - 1,
            )
        }
    }

    /// Number of blocks the geometry addresses
    pub fn total_blocks(&self) -> u32 {
        self.track0_sectors as u32 + self.max_track as u32 * self.sectors_per_track as u32
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} tracks of {} sectors, track 0 has {} sectors",
            self.kind,
            self.max_track as u32 + 1,
            self.sectors_per_track,
            self.track0_sectors
        )
    }
}
