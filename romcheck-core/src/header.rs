pub mod cartridge;

pub use cartridge::*;

use crate::{Category, CgbSupport};

pub trait Header: std::fmt::Debug + Send + Sync {
    /// Returns the raw CGB capability byte.
    fn cgb_flag(&self) -> u8;

    /// Returns the game title with padding stripped.
    fn title(&self) -> &str;

    /// Returns a short human-readable name, e.g. "GB".
    fn format_name(&self) -> &'static str;

    /// Returns how the cartridge uses Color hardware.
    fn cgb_support(&self) -> CgbSupport {
        CgbSupport::from_flag(self.cgb_flag())
    }

    /// Returns the category implied by the capability byte.
    fn category(&self) -> Category {
        self.cgb_support().category()
    }

    fn from_reader<R: std::io::Read + std::io::Seek>(cur: &mut R) -> anyhow::Result<Self>
    where
        Self: Sized;
}
