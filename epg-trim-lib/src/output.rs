//! Atomic writers for the trimmed playlist and guide.
//!
//! Output goes to `<name>.tmp` next to the target and is renamed into place
//! once complete, so the final path only ever holds a whole file.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::{Compression, GzBuilder};

/// Write `text` to `path`.
pub fn write_text(path: &Path, text: &str) -> io::Result<()> {
    write_atomic(path, |file| file.write_all(text.as_bytes()))
}

/// Write a gzip-compressed file, with `fill` producing the uncompressed
/// content. The gzip header carries no timestamp or file name, so equal
/// content always gives equal bytes.
pub fn write_gzip<T>(
    path: &Path,
    fill: impl FnOnce(&mut dyn Write) -> io::Result<T>,
) -> io::Result<T> {
    write_atomic(path, |file| {
        let mut encoder = GzBuilder::new()
            .mtime(0)
            .write(file, Compression::default());
        let result = fill(&mut encoder)?;
        encoder.try_finish()?;
        Ok(result)
    })
}

fn write_atomic<T>(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> io::Result<T>,
) -> io::Result<T> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    let result = File::create(&tmp).and_then(|file| {
        let mut writer = BufWriter::new(file);
        let value = write(&mut writer)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(value)
    });

    match result {
        Ok(value) => {
            fs::rename(&tmp, path)?;
            log::debug!("Wrote {}", path.display());
            Ok(value)
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
#[path = "tests/output_tests.rs"]
mod tests;
