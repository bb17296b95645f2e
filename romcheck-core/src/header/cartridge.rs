use crate::header::Header;
use anyhow::bail;
use byteorder::{ReadBytesExt, BE};
use std::io::{self, SeekFrom};

/// File offset where the cartridge header begins.
pub const HEADER_START: u64 = 0x100;

/// File offset one past the last header byte.
pub const HEADER_END: u64 = 0x150;

/// File offset of the CGB capability byte.
pub const CGB_FLAG_OFFSET: usize = 0x143;

/// The Game Boy cartridge header, found at `0x100..0x150` in every ROM image.
///
/// Only the title and the CGB flag are used for classification. The other
/// fields are kept for display and debugging and are never validated.
///
/// Reference: [Pan Docs, The Cartridge Header](https://gbdev.io/pandocs/The_Cartridge_Header.html)
#[derive(Debug, Clone)]
pub struct CartridgeHeader {
    /// Boot jump, usually `NOP; JP $0150`.
    pub entry_point: [u8; 4],

    /// Nintendo logo bitmap checked by the boot ROM.
    pub logo: [u8; 48],

    /// Upper-case ASCII title, NUL padding removed.
    ///
    /// On Color cartridges the last title bytes overlap the manufacturer
    /// code, so this may carry trailing garbage for those.
    pub title: String,

    /// CGB capability byte at `0x143`.
    ///
    /// - `0x80`: works on DMG, enhanced on CGB
    /// - `0xC0`: CGB only
    pub cgb_flag: u8,

    /// Two-character licensee code, used when `old_licensee == 0x33`.
    pub new_licensee: [u8; 2],

    /// `0x03` when the game supports SGB functions.
    pub sgb_flag: u8,

    /// Mapper and extra hardware (MBC1, MBC5+RAM+BATTERY, ...).
    pub cartridge_type: u8,

    /// ROM size as `32 KiB << n`.
    pub rom_size: u8,

    /// External RAM size code.
    pub ram_size: u8,

    /// `0x00` Japan, `0x01` overseas.
    pub destination: u8,

    pub old_licensee: u8,

    pub mask_rom_version: u8,

    /// Checksum over `0x134..=0x14C`.
    pub header_checksum: u8,

    /// Sum of all ROM bytes except these two, big-endian.
    pub global_checksum: u16,
}

impl CartridgeHeader {
    /// Parses the header from a whole ROM image.
    pub fn parse(rom: &[u8]) -> anyhow::Result<Self> {
        if (rom.len() as u64) < HEADER_END {
            bail!("ROM too small for a cartridge header: {} bytes", rom.len());
        }
        Self::from_reader(&mut io::Cursor::new(rom))
    }
}

impl Header for CartridgeHeader {
    fn cgb_flag(&self) -> u8 {
        self.cgb_flag
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn format_name(&self) -> &'static str {
        self.category().name()
    }

    fn from_reader<R: io::Read + io::Seek>(cur: &mut R) -> anyhow::Result<CartridgeHeader> {
        cur.seek(SeekFrom::Start(HEADER_START))?;

        let mut entry_point = [0u8; 4];
        cur.read_exact(&mut entry_point)?;
        let mut logo = [0u8; 48];
        cur.read_exact(&mut logo)?;
        let mut raw_title = [0u8; 15];
        cur.read_exact(&mut raw_title)?;

        let title = raw_title
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' })
            .collect::<String>()
            .trim_end()
            .to_string();

        let cgb_flag = cur.read_u8()?;
        let mut new_licensee = [0u8; 2];
        cur.read_exact(&mut new_licensee)?;

        Ok(CartridgeHeader {
            entry_point,
            logo,
            title,
            cgb_flag,
            new_licensee,
            sgb_flag: cur.read_u8()?,
            cartridge_type: cur.read_u8()?,
            rom_size: cur.read_u8()?,
            ram_size: cur.read_u8()?,
            destination: cur.read_u8()?,
            old_licensee: cur.read_u8()?,
            mask_rom_version: cur.read_u8()?,
            header_checksum: cur.read_u8()?,
            global_checksum: cur.read_u16::<BE>()?,
        })
    }
}

/// Reads the little-endian jump target out of a `JP nn` entry point.
pub fn entry_jump_target(header: &CartridgeHeader) -> Option<u16> {
    match header.entry_point {
        [_, 0xC3, lo, hi] => Some(u16::from_le_bytes([lo, hi])),
        _ => None,
    }
}
