/// Per-connection session state

use crate::error::{FlexError, Result};
use crate::filesystem::HostFs;
use crate::format::{SectorBuf, SECTOR_SIZE};
use crate::image::DiskImage;
use log::info;
use std::path::Path;

/// State shared by every command handler of one connection
///
/// Holds the host filesystem (and with it the working directory), the
/// mounted image if any, and the sector buffer reused by every transfer.
/// Serving several connections at once needs one `Session` each.
pub struct Session<F: HostFs> {
    pub(crate) fs: F,
    pub(crate) cwd: String,
    pub(crate) disk: Option<DiskImage>,
    pub(crate) buffer: SectorBuf,
}

impl<F: HostFs> Session<F> {
    /// Create a session with no disk mounted
    pub fn new(fs: F) -> Self {
        let cwd = fs.current_dir().display().to_string();
        Self {
            fs,
            cwd,
            disk: None,
            buffer: [0u8; SECTOR_SIZE],
        }
    }

    /// Host filesystem
    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Current directory as reported to the client
    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    /// Mounted image, if any
    pub fn disk(&self) -> Option<&DiskImage> {
        self.disk.as_ref()
    }

    /// True when an image is mounted
    pub fn is_ready(&self) -> bool {
        self.disk.is_some()
    }

    /// Contents of the sector buffer
    pub fn buffer(&self) -> &SectorBuf {
        &self.buffer
    }

    /// Close the mounted image, if any
    pub fn unmount(&mut self) {
        if let Some(disk) = self.disk.take() {
            info!("Closing {}", disk.name());
        }
    }

    /// Open `path` and make it the mounted image
    ///
    /// Any previously mounted image is closed first, so on failure the
    /// session is left with nothing mounted.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<&DiskImage> {
        self.unmount();
        let image = DiskImage::open(path)?;
        Ok(self.attach(image))
    }

    pub(crate) fn attach(&mut self, image: DiskImage) -> &DiskImage {
        info!(
            "Mounted {} ({})",
            image.name(),
            if image.is_read_only() { "read-only" } else { "read/write" }
        );
        self.disk.insert(image)
    }

    /// Read a sector of the mounted image into the buffer
    ///
    /// On any failure the buffer is zero-filled.
    pub(crate) fn read_sector(&mut self, track: u8, sector: u8) -> Result<()> {
        let result = match self.disk.as_mut() {
            Some(disk) => disk.read_sector(track, sector, &mut self.buffer),
            None => Err(FlexError::NotReady),
        };
        if result.is_err() {
            self.buffer.fill(0);
        }
        result
    }

    /// Write the buffer to a sector of the mounted image
    pub(crate) fn write_sector(&mut self, track: u8, sector: u8) -> Result<()> {
        match self.disk.as_mut() {
            Some(disk) => disk.write_sector(track, sector, &self.buffer),
            None => Err(FlexError::NotReady),
        }
    }
}
