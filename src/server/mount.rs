/// Mount and change-directory operations

use crate::error::Result;
use crate::filesystem::HostFs;
use crate::format::IMAGE_EXTENSION;
use crate::image::DiskImage;
use crate::server::Session;
use log::{debug, info};

impl<F: HostFs> Session<F> {
    /// Mount the image `name` from the working directory
    ///
    /// The extension is appended here: `NAME.DSK` is tried first, then
    /// `NAME.dsk`. The previous image is closed before either attempt,
    /// so a failed mount leaves nothing mounted.
    pub fn mount(&mut self, name: &str) -> Result<&DiskImage> {
        self.unmount();

        let upper = self.fs.resolve(&format!("{}.{}", name, IMAGE_EXTENSION));
        let image = match DiskImage::open(&upper) {
            Ok(image) => image,
            Err(e) => {
                debug!("{}: {}, trying with lowercase...", upper.display(), e);
                let lower = self.fs.resolve(&format!(
                    "{}.{}",
                    name,
                    IMAGE_EXTENSION.to_ascii_lowercase()
                ));
                DiskImage::open(lower)?
            }
        };

        Ok(self.attach(image))
    }

    /// Change the working directory
    ///
    /// The cached directory string is refreshed only on success.
    pub fn change_directory(&mut self, path: &str) -> Result<()> {
        match self.fs.change_dir(path) {
            Ok(dir) => {
                self.cwd = dir.display().to_string();
                info!("Changing directory to {}", self.cwd);
                Ok(())
            }
            Err(e) => {
                debug!("Cannot change directory to {}: {}", path, e);
                Err(e.into())
            }
        }
    }
}
