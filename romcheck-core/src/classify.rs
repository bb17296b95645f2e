use crate::header::CGB_FLAG_OFFSET;
use crate::{Category, CgbSupport, RomError};

/// Decodes the CGB capability byte of a ROM image.
pub fn cgb_support(rom: &[u8]) -> Result<CgbSupport, RomError> {
    rom.get(CGB_FLAG_OFFSET)
        .map(|&flag| CgbSupport::from_flag(flag))
        .ok_or(RomError::MalformedRom { len: rom.len() })
}

/// Classifies a ROM image as GB or GBC from its header.
pub fn classify(rom: &[u8]) -> Result<Category, RomError> {
    cgb_support(rom).map(CgbSupport::category)
}
