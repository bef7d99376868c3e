//! File-based data source.
//!
//! Polls a JSON file holding ice observations.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{DataSource, IceSnapshot};

/// A data source that reads ice observations from a JSON file.
///
/// The file may hold an ERDDAP table, a proxy history document, or a plain
/// array of rows. The newest row becomes the latest reading and every row
/// is used as history.
///
/// The source tracks the file's modification time and only returns
/// new data when the file has been updated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file's modification time.
    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    /// Read and parse the file.
    fn read_file(&mut self) -> Option<IceSnapshot> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                return None;
            }
        };

        let payload: serde_json::Value = match serde_json::from_str(&content) {
            Ok(payload) => payload,
            Err(e) => {
                self.last_error = Some(format!("Parse error: {}", e));
                return None;
            }
        };

        match IceSnapshot::from_payload(&payload, &self.description) {
            Some(snapshot) => {
                self.last_error = None;
                Some(snapshot)
            }
            None => {
                self.last_error = Some("No ice observations in file".to_string());
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<IceSnapshot> {
        let current_modified = self.get_modified_time();

        // Check if file has been modified since last read
        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, don't update
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            if let Some(snapshot) = self.read_file() {
                self.last_modified = current_modified;
                return Some(snapshot);
            }
        }

        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }

    fn refresh(&mut self) {
        // Forget the mtime so the next poll re-reads the file
        self.last_modified = None;
    }
}
