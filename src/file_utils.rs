use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::spreadsheet::{SpreadsheetFormat, DOWNLOAD_FILE_NAME};

// @module: File and directory utilities

/// Suffix appended to a file stem when processing a folder
pub const PROCESSED_SUFFIX: &str = "_Processed";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @generates: Default output path for a single processed file
    pub fn default_output_path<P: AsRef<Path>>(input_file: P) -> PathBuf {
        let input_file = input_file.as_ref();
        match input_file.parent() {
            Some(parent) => parent.join(DOWNLOAD_FILE_NAME),
            None => PathBuf::from(DOWNLOAD_FILE_NAME),
        }
    }

    // @generates: `<stem>_Processed.<ext>` next to the input
    pub fn processed_output_path<P: AsRef<Path>>(input_file: P) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();
        let extension = SpreadsheetFormat::from_path(input_file)
            .unwrap_or_default()
            .extension();
        let file_name = format!("{}{}.{}", stem, PROCESSED_SUFFIX, extension);

        match input_file.parent() {
            Some(parent) => parent.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Check whether a path is an output this tool wrote earlier
    pub fn is_processed_output<P: AsRef<Path>>(path: P) -> bool {
        let path = path.as_ref();
        let is_download = path
            .file_name()
            .map(|name| name.to_string_lossy() == DOWNLOAD_FILE_NAME)
            .unwrap_or(false);
        let has_suffix = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().ends_with(PROCESSED_SUFFIX))
            .unwrap_or(false);
        is_download || has_suffix
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Find every spreadsheet input in a directory tree, skipping earlier outputs
    pub fn find_spreadsheets<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for format in [SpreadsheetFormat::Xlsx, SpreadsheetFormat::Csv] {
            let mut found = Self::find_files(dir.as_ref(), format.extension())?;
            files.append(&mut found);
        }
        files.retain(|path| !Self::is_processed_output(path));
        files.sort();
        Ok(files)
    }

    // @reads: Whole file as bytes
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        let path = path.as_ref();
        fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
    }

    // @writes: Bytes to file, creating parent directories
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }
        fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
    }
}
