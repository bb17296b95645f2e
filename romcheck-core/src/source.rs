use crate::archive::{ArchiveKind, ArchiveReader, SevenZipReader, ZipReader};
use crate::Extension;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Where a ROM's bytes come from.
#[derive(Debug, Clone)]
pub enum Origin {
    /// A file on disk, read when the ROM is checked.
    File(PathBuf),
    /// Bytes already pulled out of an archive.
    Memory(Vec<u8>),
}

/// A ROM waiting to be checked.
#[derive(Debug, Clone)]
pub struct RomSource {
    pub display_name: String,
    pub origin: Origin,
}

impl RomSource {
    /// Name whose extension is compared with the header.
    pub fn file_name(&self) -> &str {
        match &self.origin {
            Origin::File(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(&self.display_name),
            Origin::Memory(_) => &self.display_name,
        }
    }

    pub fn load(&self) -> std::io::Result<std::borrow::Cow<'_, [u8]>> {
        match &self.origin {
            Origin::File(path) => std::fs::read(path).map(Into::into),
            Origin::Memory(data) => Ok(data.as_slice().into()),
        }
    }
}

#[derive(Debug)]
pub enum InputFailureKind {
    NotFound,
    Skipped,
    EmptyArchive,
    Archive(anyhow::Error),
    Walk(walkdir::Error),
}

/// An input that produced no ROMs.
#[derive(Debug)]
pub struct InputFailure {
    pub path: PathBuf,
    pub kind: InputFailureKind,
}

impl fmt::Display for InputFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        match &self.kind {
            InputFailureKind::NotFound => write!(f, "{path}: no such file or directory"),
            InputFailureKind::Skipped => write!(f, "{path}: not a ROM, folder or archive"),
            InputFailureKind::EmptyArchive => write!(f, "{path}: no .gb/.gbc entries"),
            InputFailureKind::Archive(e) => write!(f, "{path}: {e:#}"),
            InputFailureKind::Walk(e) => write!(f, "{path}: {e}"),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct CollectOptions {
    /// Explicit `7za` binary; looked up next to the executable and on `PATH` otherwise.
    pub seven_zip: Option<PathBuf>,
}

/// ROMs found across all inputs, in discovery order.
#[derive(Debug, Default)]
pub struct Collected {
    pub sources: Vec<RomSource>,
    pub failures: Vec<InputFailure>,
    /// How many inputs existed on disk.
    pub existing_inputs: usize,
}

impl Collected {
    fn fail(&mut self, path: &Path, kind: InputFailureKind) {
        let failure = InputFailure {
            path: path.to_path_buf(),
            kind,
        };
        log::warn!("{}", failure);
        self.failures.push(failure);
    }
}

pub fn collect<P: AsRef<Path>>(paths: &[P], options: &CollectOptions) -> Collected {
    let mut collected = Collected::default();

    for path in paths.iter().map(AsRef::as_ref) {
        if !path.exists() {
            collected.fail(path, InputFailureKind::NotFound);
            continue;
        }
        collected.existing_inputs += 1;

        if let Some(kind) = ArchiveKind::from_path(path).filter(|_| path.is_file()) {
            log::info!("Archive {}", path.display());
            collect_archive(path, kind, options, &mut collected);
        } else if path.is_dir() {
            log::info!("Folder {}", path.display());
            collect_folder(path, &mut collected);
        } else if Extension::from_name(&path.to_string_lossy()).is_some() {
            collected.sources.push(RomSource {
                display_name: display_file_name(path),
                origin: Origin::File(path.to_path_buf()),
            });
        } else {
            collected.fail(path, InputFailureKind::Skipped);
        }
    }

    log::info!(
        "Collected {} ROMs, {} inputs failed",
        collected.sources.len(),
        collected.failures.len()
    );
    collected
}

fn collect_archive(path: &Path, kind: ArchiveKind, options: &CollectOptions, out: &mut Collected) {
    let entries = match kind {
        ArchiveKind::Zip => ZipReader::open(path).and_then(|mut r| r.list_entries()),
        ArchiveKind::SevenZip => {
            SevenZipReader::new(path, options.seven_zip.as_deref()).list_entries()
        }
    };

    match entries {
        Ok(entries) if entries.is_empty() => out.fail(path, InputFailureKind::EmptyArchive),
        Ok(entries) => out.sources.extend(entries.into_iter().map(|e| RomSource {
            display_name: e.name,
            origin: Origin::Memory(e.data),
        })),
        Err(e) => out.fail(path, InputFailureKind::Archive(e)),
    }
}

fn collect_folder(root: &Path, out: &mut Collected) {
    let walker = WalkDir::new(root).sort_by_file_name().into_iter();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let at = e.path().unwrap_or(root).to_path_buf();
                out.fail(&at, InputFailureKind::Walk(e));
                continue;
            }
        };
        // Symlinks are not followed while walking, but links to files still count.
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if Extension::from_name(&name).is_none() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let display_name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        out.sources.push(RomSource {
            display_name,
            origin: Origin::File(entry.into_path()),
        });
    }
}

fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
