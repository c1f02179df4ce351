/// Flex disk format definitions and constants

/// Format and wire constants
pub mod constants;
/// Flex name field decoding
pub mod name;
/// System Information Record
pub mod sir;

pub use constants::*;
pub use name::{format_name, is_name_byte};
pub use sir::SystemInfoRecord;

/// Sector buffer: exactly one Flex sector
pub type SectorBuf = [u8; SECTOR_SIZE];

/// Check whether a host file name carries the disk image extension
///
/// The comparison is case-insensitive, so `GAME.DSK` and `game.dsk` both match.
pub fn is_image_name(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(IMAGE_EXTENSION))
        .unwrap_or(false)
}

/// Case-insensitive prefix match used to filter image listings
pub fn has_prefix_ignore_case(name: &str, prefix: &str) -> bool {
    name.len() >= prefix.len()
        && name.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}
