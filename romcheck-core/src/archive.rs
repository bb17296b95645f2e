pub mod sevenzip;
pub mod zipfile;

pub use sevenzip::SevenZipReader;
pub use zipfile::ZipReader;

use crate::Extension;
use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::Path;

/// Largest entry read out of an archive. Licensed cartridges top out at 8 MiB.
pub const MAX_ENTRY_SIZE: u64 = 8 << 20;

/// One ROM pulled out of an archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Base file name of the entry, without the directories inside the archive.
    pub name: String,
    pub data: Vec<u8>,
}

/// Something that can hand out the `.gb`/`.gbc` files stored in an archive.
pub trait ArchiveReader {
    /// Returns every ROM entry, in archive order.
    fn list_entries(&mut self) -> Result<Vec<ArchiveEntry>>;
}

/// Reads at most `MAX_ENTRY_SIZE` bytes; anything larger is not a ROM.
pub(crate) fn read_entry<R: Read>(reader: R, name: &str) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader
        .take(MAX_ENTRY_SIZE + 1)
        .read_to_end(&mut data)
        .with_context(|| format!("extracting {}", name))?;
    if data.len() as u64 > MAX_ENTRY_SIZE {
        bail!("{} is larger than {} bytes", name, MAX_ENTRY_SIZE);
    }
    Ok(data)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
    Zip,
    SevenZip,
}

impl ArchiveKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "zip" => Some(ArchiveKind::Zip),
            "7z" => Some(ArchiveKind::SevenZip),
            _ => None,
        }
    }
}

/// Base name of an archive member if it looks like a ROM.
pub(crate) fn rom_entry_name(path: &str) -> Option<&str> {
    let base = path.rsplit(['/', '\\']).next()?;
    Extension::from_name(base).map(|_| base)
}
