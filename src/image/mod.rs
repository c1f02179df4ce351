/// Flex disk image access

/// Builder for blank Flex images
pub mod builder;
/// Geometry detection and block translation
pub mod geometry;

pub use builder::FlexImageBuilder;
pub use geometry::{Geometry, GeometryKind};

use crate::error::{FlexError, Result};
use crate::format::{SectorBuf, SystemInfoRecord, SECTOR_SIZE, SIR_BLOCK};
use log::{debug, info, warn};
use std::fs::{File, OpenOptions, Permissions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// An open Flex disk image file
///
/// The file is addressed as a flat array of 256-byte blocks. Track/sector
/// addresses are translated through the [`Geometry`] detected at open time.
/// There is no locking against other writers of the same file.
#[derive(Debug)]
pub struct DiskImage {
    file: File,
    path: PathBuf,
    size: u64,
    read_only: bool,
    sir: SystemInfoRecord,
    geometry: Geometry,
}

impl DiskImage {
    /// Open and validate a Flex disk image
    ///
    /// Images without the owner write permission are opened read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        let read_only = owner_read_only(&metadata.permissions());
        let size = metadata.len();

        let mut file = OpenOptions::new()
            .read(true)
            .write(!read_only)
            .open(path)?;

        if size % SECTOR_SIZE as u64 != 0 {
            return Err(FlexError::SizeMismatch { size });
        }

        let observed = size / SECTOR_SIZE as u64;
        debug!("Opening {} ({} sectors)", path.display(), observed);

        let mut sector = [0u8; SECTOR_SIZE];
        read_block(&mut file, SIR_BLOCK, &mut sector)?;
        let sir = SystemInfoRecord::parse(&sector)?;

        if sir.free_sectors as u32 > sir.data_sectors() {
            warn!("Number of free sectors bigger than disk size");
        }

        info!(
            "Flex volume name: '{}', volume number {} ({} tracks, {} sectors/track)",
            sir.label,
            sir.volume_number,
            sir.max_track as u16 + 1,
            sir.sectors_per_track
        );

        let geometry = Geometry::detect(sir.max_track, sir.sectors_per_track, observed)?;
        debug!("{}", geometry);

        Ok(Self {
            file,
            path: path.to_path_buf(),
            size,
            read_only,
            sir,
            geometry,
        })
    }

    /// Path the image was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name of the image, without directories
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Image size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// True if the image was opened read-only
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// The System Information Record read at open time
    pub fn sir(&self) -> &SystemInfoRecord {
        &self.sir
    }

    /// Detected geometry
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Translate an address, failing for addresses outside the geometry
    pub fn block_index(&self, track: u8, sector: u8) -> Result<u32> {
        self.geometry
            .block_index(track, sector)
            .ok_or(FlexError::InvalidAddress { track, sector })
    }

    /// Read one sector into `buf`
    pub fn read_sector(&mut self, track: u8, sector: u8, buf: &mut SectorBuf) -> Result<()> {
        let block = self.block_index(track, sector)?;
        read_block(&mut self.file, block as u64, buf)
    }

    /// Write one sector from `data`
    pub fn write_sector(&mut self, track: u8, sector: u8, data: &SectorBuf) -> Result<()> {
        if self.read_only {
            return Err(FlexError::ReadOnly);
        }
        let block = self.block_index(track, sector)?;
        seek_block(&mut self.file, block as u64)?;
        self.file.write_all(data)?;
        Ok(())
    }
}

#[cfg(unix)]
fn owner_read_only(permissions: &Permissions) -> bool {
    use std::os::unix::fs::PermissionsExt;
    permissions.mode() & 0o200 == 0
}

#[cfg(not(unix))]
fn owner_read_only(permissions: &Permissions) -> bool {
    permissions.readonly()
}

fn seek_block(file: &mut File, block: u64) -> Result<()> {
    let pos = block * SECTOR_SIZE as u64;
    if file.seek(SeekFrom::Start(pos))? != pos {
        return Err(io::Error::new(io::ErrorKind::Other, format!("seek to {} failed", pos)).into());
    }
    Ok(())
}

fn read_block(file: &mut File, block: u64, buf: &mut SectorBuf) -> Result<()> {
    seek_block(file, block)?;
    file.read_exact(buf)?;
    Ok(())
}
