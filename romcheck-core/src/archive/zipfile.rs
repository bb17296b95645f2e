use super::{read_entry, rom_entry_name, ArchiveEntry, ArchiveReader};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

#[derive(Debug)]
pub struct ZipReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl ZipReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)
            .with_context(|| format!("opening {}", path.as_ref().display()))?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> ZipReader<R> {
    pub fn new(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader).context("not a readable zip archive")?;
        Ok(Self { archive })
    }
}

impl<R: Read + Seek> ArchiveReader for ZipReader<R> {
    fn list_entries(&mut self) -> Result<Vec<ArchiveEntry>> {
        let mut entries = Vec::new();
        for i in 0..self.archive.len() {
            let mut file = self.archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let Some(name) = rom_entry_name(file.name()).map(str::to_string) else {
                log::debug!("zip: skipping {}", file.name());
                continue;
            };
            let data = read_entry(&mut file, &name)?;
            entries.push(ArchiveEntry { name, data });
        }
        log::info!("zip: {} ROM entries", entries.len());
        Ok(entries)
    }
}
