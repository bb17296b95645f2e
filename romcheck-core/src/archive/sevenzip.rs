use super::{read_entry, rom_entry_name, ArchiveEntry, ArchiveReader};
use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use walkdir::WalkDir;

#[cfg(windows)]
const TOOL_NAME: &str = "7za.exe";
#[cfg(not(windows))]
const TOOL_NAME: &str = "7za";

/// Reads `.7z` archives through the external `7za` tool.
///
/// The whole archive is extracted once into a scratch directory, so solid
/// blocks are decompressed a single time.
#[derive(Debug)]
pub struct SevenZipReader {
    tool: PathBuf,
    archive: PathBuf,
}

impl SevenZipReader {
    pub fn new<P: AsRef<Path>>(archive: P, tool: Option<&Path>) -> Self {
        Self {
            tool: tool.map(Path::to_path_buf).unwrap_or_else(default_tool),
            archive: archive.as_ref().to_path_buf(),
        }
    }

    /// Arguments for `7za x`: ROM files only, case-insensitive, switches
    /// closed with `--` so the archive name is never read as one.
    fn extract_args(&self, out_dir: &Path) -> Vec<OsString> {
        let mut out = OsString::from("-o");
        out.push(out_dir);
        vec![
            "x".into(),
            "-y".into(),
            "-ssc-".into(),
            out,
            "-ir!*.gb".into(),
            "-ir!*.gbc".into(),
            "--".into(),
            self.archive.clone().into_os_string(),
        ]
    }

    fn extract_to(&self, out_dir: &Path) -> Result<()> {
        let output = Command::new(&self.tool)
            .args(self.extract_args(out_dir))
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("running {}", self.tool.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let msg = if stderr.trim().is_empty() { stdout } else { stderr };
            let msg: String = msg.trim().chars().take(80).collect();
            bail!("{} exited with {}: {}", self.tool.display(), output.status, msg);
        }
        Ok(())
    }
}

impl ArchiveReader for SevenZipReader {
    fn list_entries(&mut self) -> Result<Vec<ArchiveEntry>> {
        let scratch = ScratchDir::create()?;
        self.extract_to(scratch.path())?;

        let mut entries = Vec::new();
        for entry in WalkDir::new(scratch.path()).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            let Some(name) = rom_entry_name(&file_name).map(str::to_string) else {
                log::debug!("7z: skipping {}", entry.path().display());
                continue;
            };
            let file = File::open(entry.path())
                .with_context(|| format!("opening extracted {}", name))?;
            let data = read_entry(file, &name)?;
            entries.push(ArchiveEntry { name, data });
        }
        log::info!("7z: {} ROM entries", entries.len());
        Ok(entries)
    }
}

/// Temporary extraction directory, removed on drop.
#[derive(Debug)]
struct ScratchDir(PathBuf);

impl ScratchDir {
    fn create() -> Result<Self> {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let dir = std::env::temp_dir().join(format!(
            "romcheck-7z-{}-{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        if dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating {}", dir.display()))?;
        Ok(Self(dir))
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.0) {
            log::warn!("could not remove {}: {}", self.0.display(), e);
        }
    }
}

/// Prefers a `7za` shipped next to the executable, then whatever is on `PATH`.
fn default_tool() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(TOOL_NAME)))
        .filter(|candidate| candidate.is_file())
        .unwrap_or_else(|| PathBuf::from(TOOL_NAME))
}
