use anyhow::Result;
use romcheck_core::header::CGB_FLAG_OFFSET;
use romcheck_core::archive::{ArchiveReader, SevenZipReader};
use romcheck_core::{collect, run, CollectOptions, InputFailureKind, Status};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Scratch directory removed on drop.
struct Scratch(PathBuf);

impl Scratch {
    fn new(name: &str) -> Result<Self> {
        let dir = std::env::temp_dir().join(format!("romcheck-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir)?;
        Ok(Self(dir))
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn rom(flag: u8) -> Vec<u8> {
    let mut data = vec![0u8; 32 * 1024];
    data[CGB_FLAG_OFFSET] = flag;
    data
}

fn write_zip(path: &Path, files: &[(&str, Vec<u8>)]) -> Result<()> {
    let mut writer = ZipWriter::new(std::fs::File::create(path)?);
    for (name, data) in files {
        writer.start_file(*name, SimpleFileOptions::default())?;
        writer.write_all(data)?;
    }
    writer.finish()?;
    Ok(())
}

#[test]
fn folder_walk_finds_nested_roms() -> Result<()> {
    let scratch = Scratch::new("walk")?;
    let root = scratch.path().join("collection");
    std::fs::create_dir_all(root.join("color"))?;
    std::fs::write(root.join("Tetris.gb"), rom(0x00))?;
    std::fs::write(root.join("color").join("Zelda.GB"), rom(0xC0))?;
    std::fs::write(root.join("color").join("notes.txt"), b"hi")?;

    let collected = collect(&[&root], &CollectOptions::default());
    assert!(collected.failures.is_empty());
    let names: Vec<_> = collected.sources.iter().map(|s| s.display_name.as_str()).collect();
    assert_eq!(names, ["Tetris.gb", "color/Zelda.GB"]);

    let report = run(&collected.sources, 2);
    let statuses: Vec<_> = report.outcomes.iter().map(|o| o.status()).collect();
    assert_eq!(statuses, [Status::Match, Status::Mismatch]);
    Ok(())
}

#[test]
fn zip_archives_and_raw_files_mix() -> Result<()> {
    let scratch = Scratch::new("zip")?;
    let archive = scratch.path().join("Games.ZIP");
    write_zip(
        &archive,
        &[
            ("set/test.gb", rom(0xC0)),
            ("set/test.gbc", rom(0xC0)),
            ("set/info.nfo", b"scene".to_vec()),
        ],
    )?;
    let raw = scratch.path().join("mono.gb");
    std::fs::write(&raw, rom(0x00))?;
    let other = scratch.path().join("cover.png");
    std::fs::write(&other, b"png")?;

    let inputs = [archive.clone(), raw, other, scratch.path().join("missing.gb")];
    let collected = collect(&inputs, &CollectOptions::default());
    assert_eq!(collected.existing_inputs, 3);
    assert_eq!(collected.failures.len(), 2);
    assert!(matches!(collected.failures[0].kind, InputFailureKind::Skipped));
    assert!(matches!(collected.failures[1].kind, InputFailureKind::NotFound));

    let report = run(&collected.sources, 4);
    let rows: Vec<_> = report
        .outcomes
        .iter()
        .map(|o| (o.display_name.as_str(), o.status()))
        .collect();
    assert_eq!(
        rows,
        [
            ("test.gb", Status::Mismatch),
            ("test.gbc", Status::Match),
            ("mono.gb", Status::Match),
        ]
    );
    Ok(())
}

#[test]
fn archive_without_roms_is_a_failure() -> Result<()> {
    let scratch = Scratch::new("empty-zip")?;
    let archive = scratch.path().join("docs.zip");
    write_zip(&archive, &[("readme.txt", b"nothing here".to_vec())])?;

    let collected = collect(&[&archive], &CollectOptions::default());
    assert!(collected.sources.is_empty());
    assert!(matches!(collected.failures[0].kind, InputFailureKind::EmptyArchive));
    Ok(())
}

#[test]
fn corrupt_zip_does_not_stop_the_batch() -> Result<()> {
    let scratch = Scratch::new("bad-zip")?;
    let archive = scratch.path().join("broken.zip");
    std::fs::write(&archive, b"PK but not really")?;
    let raw = scratch.path().join("ok.gbc");
    std::fs::write(&raw, rom(0x80))?;

    let collected = collect(&[archive, raw], &CollectOptions::default());
    assert!(matches!(collected.failures[0].kind, InputFailureKind::Archive(_)));
    assert_eq!(collected.sources.len(), 1);
    assert_eq!(run(&collected.sources, 1).summary().matched, 1);
    Ok(())
}

#[test]
fn verdicts_serialize_for_reports() -> Result<()> {
    let verdict = romcheck_core::check("test.gb", &rom(0xC0))?;
    let json = serde_json::to_value(&verdict)?;
    assert_eq!(json["category"], "GBC");
    assert_eq!(json["declared"], "gb");
    assert_eq!(json["support"], "exclusive");
    assert_eq!(json["matches"], false);
    Ok(())
}

#[cfg(unix)]
#[test]
fn symlinked_roms_in_folders_are_checked() -> Result<()> {
    let scratch = Scratch::new("symlink")?;
    let library = scratch.path().join("lib");
    let collection = scratch.path().join("col");
    std::fs::create_dir_all(&library)?;
    std::fs::create_dir_all(&collection)?;
    std::fs::write(library.join("real.gb"), rom(0x80))?;
    std::os::unix::fs::symlink(library.join("real.gb"), collection.join("link.gb"))?;

    let collected = collect(&[&collection], &CollectOptions::default());
    assert!(collected.failures.is_empty());
    assert_eq!(collected.sources.len(), 1);
    assert_eq!(collected.sources[0].display_name, "link.gb");
    assert_eq!(run(&collected.sources, 1).summary().mismatched, 1);
    Ok(())
}

/// Writes an executable stand-in for `7za` that runs `body` with `$out`
/// set from the `-o` switch.
#[cfg(unix)]
fn fake_seven_zip(dir: &Path, body: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let tool = dir.join("7za");
    let script = format!(
        "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\nfor a in \"$@\"; do case \"$a\" in -o*) out=\"${{a#-o}}\" ;; esac; done\n{}\n",
        dir.join("args.txt").display(),
        body
    );
    std::fs::write(&tool, script)?;
    std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755))?;
    Ok(tool)
}

#[cfg(unix)]
#[test]
fn seven_zip_extracts_once_and_reads_roms() -> Result<()> {
    let scratch = Scratch::new("7z")?;
    let tool = fake_seven_zip(
        scratch.path(),
        "mkdir -p \"$out/set/docs\"\n\
         printf 'readme' > \"$out/set/docs/readme.txt\"\n\
         printf 'mono' > \"$out/set/Tetris.GB\"\n\
         printf 'color' > \"$out/Zelda.gbc\"",
    )?;
    let archive = scratch.path().join("-odd [set].7z");
    std::fs::write(&archive, b"7z")?;

    let mut reader = SevenZipReader::new(&archive, Some(tool.as_path()));
    let entries = reader.list_entries()?;
    let rows: Vec<_> = entries
        .iter()
        .map(|e| (e.name.as_str(), e.data.as_slice()))
        .collect();
    assert_eq!(rows, [("Zelda.gbc", &b"color"[..]), ("Tetris.GB", &b"mono"[..])]);

    let args = std::fs::read_to_string(scratch.path().join("args.txt"))?;
    let args: Vec<_> = args.lines().collect();
    assert_eq!(args[0], "x");
    assert_eq!(args.iter().filter(|a| **a == "--").count(), 1);
    assert_eq!(args[args.len() - 2..], ["--", archive.to_str().unwrap()]);

    let failing = fake_seven_zip(scratch.path(), "echo 'Can not open the file as archive' >&2\nexit 2")?;
    let options = CollectOptions {
        seven_zip: Some(failing),
    };
    let collected = collect(&[&archive, &scratch.path().join("missing.7z")], &options);
    match &collected.failures[0].kind {
        InputFailureKind::Archive(e) => assert!(e.to_string().contains("Can not open")),
        other => panic!("expected an archive failure, got {other:?}"),
    }
    assert!(matches!(collected.failures[1].kind, InputFailureKind::NotFound));
    assert!(collected.sources.is_empty());
    Ok(())
}
