// Project archive - packages a rendered file set into a zip or a directory tree

use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;
use crate::error::{AppError, AppResult};

/// Suggested download name for generated projects
pub const ARCHIVE_FILE_NAME: &str = "fastapi_project.zip";

/// Build a zip archive in memory, one entry per map key.
///
/// Entries are deflated and stamped 1980-01-01 so the same input always
/// produces the same bytes.
pub fn archive(files: &BTreeMap<String, String>) -> AppResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let timestamp = zip::DateTime::from_date_and_time(1980, 1, 1, 0, 0, 0)
        .map_err(|_| AppError::ArchiveError("invalid archive timestamp".to_string()))?;
    let options = SimpleFileOptions::default()
        .last_modified_time(timestamp)
        .compression_method(zip::CompressionMethod::Deflated);

    for (path, content) in files {
        zip.start_file(path.as_str(), options)?;
        zip.write_all(content.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Write the file set below `root`, creating parent directories as needed
pub fn write_tree(files: &BTreeMap<String, String>, root: &Path) -> AppResult<()> {
    for (path, content) in files {
        let target = root.join(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, content)?;
    }
    Ok(())
}
