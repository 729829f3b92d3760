//! Validated loading of CEPL query files

use crate::config::constants::compile_time::file_processing::{
    CEPL_EXTENSION, MAX_FILE_SIZE, MAX_LINE_COUNT,
};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::{codes, Code};
use crate::{log_debug, log_error, log_success};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .{CEPL_EXTENSION}, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("File is empty: {path}")]
    EmptyFile { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("File exceeds maximum line count: {lines} (max: {max_lines})")]
    TooManyLines { lines: usize, max_lines: usize },
}

impl FileProcessorError {
    pub fn error_code(&self) -> Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::InvalidExtension { .. } => {
                codes::file_processing::INVALID_EXTENSION
            }
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::EmptyFile { .. } => codes::file_processing::EMPTY_FILE,
            FileProcessorError::PermissionDenied { .. } => {
                codes::file_processing::PERMISSION_DENIED
            }
            FileProcessorError::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
            FileProcessorError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
            FileProcessorError::TooManyLines { .. } => codes::file_processing::TOO_MANY_LINES,
        }
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    fn from_io(error: io::Error, path: &Path, action: &str) -> Self {
        let path = path.display().to_string();
        match error.kind() {
            io::ErrorKind::NotFound => FileProcessorError::FileNotFound { path },
            io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied { path },
            io::ErrorKind::InvalidData => FileProcessorError::InvalidEncoding { path },
            _ => FileProcessorError::IoError {
                message: format!("Failed to {} '{}': {}", action, path, error),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    pub size: u64,
    /// Lowercased extension, if any
    pub extension: Option<String>,
    pub line_count: usize,
    pub is_cepl_file: bool,
}

impl FileMetadata {
    pub fn human_readable_size(&self) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = self.size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", self.size, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    pub source: String,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

impl FileProcessingResult {
    pub fn char_count(&self) -> usize {
        self.source.chars().count()
    }

    /// Only whitespace and no query text
    pub fn is_effectively_empty(&self) -> bool {
        self.source.trim().is_empty()
    }
}

pub struct FileProcessor {
    pub require_cepl_extension: bool,
    pub enable_performance_logging: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self::from_preferences(&FileProcessorPreferences::default())
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_cepl_extension: prefs.require_cepl_extension,
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    pub fn with_cepl_extension_required(mut self, required: bool) -> Self {
        self.require_cepl_extension = required;
        self
    }

    /// Validate and read a query file
    pub fn process_file(&self, path: &Path) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = Instant::now();

        match self.load(path, start_time) {
            Ok(result) => {
                self.log_processing_success(&result);
                Ok(result)
            }
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(),
                    "file" => path.display()
                );
                Err(error)
            }
        }
    }

    fn load(&self, path: &Path, start_time: Instant) -> Result<FileProcessingResult, FileProcessorError> {
        log_debug!("Starting file processing", "file" => path.display());

        let path = self.validate_path(path)?;
        let mut metadata = self.get_metadata(&path)?;
        self.validate_file(&metadata)?;

        let source = fs::read_to_string(&path)
            .map_err(|e| FileProcessorError::from_io(e, &path, "read file"))?;

        let line_count = source.lines().count();
        if line_count > MAX_LINE_COUNT {
            return Err(FileProcessorError::TooManyLines {
                lines: line_count,
                max_lines: MAX_LINE_COUNT,
            });
        }
        metadata.line_count = line_count;

        Ok(FileProcessingResult {
            source,
            metadata,
            processing_duration: start_time.elapsed(),
        })
    }

    fn validate_path(&self, path: &Path) -> Result<PathBuf, FileProcessorError> {
        if path.as_os_str().is_empty() {
            return Err(FileProcessorError::InvalidPath {
                path: String::new(),
            });
        }

        if !path.exists() {
            return Err(FileProcessorError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        if !path.is_file() {
            return Err(FileProcessorError::InvalidPath {
                path: path.display().to_string(),
            });
        }

        path.canonicalize()
            .map_err(|e| FileProcessorError::from_io(e, path, "resolve path"))
    }

    fn get_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata =
            fs::metadata(path).map_err(|e| FileProcessorError::from_io(e, path, "read metadata of"))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());
        let is_cepl_file = extension.as_deref() == Some(CEPL_EXTENSION);

        let file_metadata = FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            line_count: 0,
            is_cepl_file,
        };

        log_debug!("File metadata collected",
            "size" => file_metadata.human_readable_size(),
            "extension" => file_metadata.extension.as_deref().unwrap_or("none"),
            "is_cepl" => is_cepl_file
        );

        Ok(file_metadata)
    }

    fn validate_file(&self, metadata: &FileMetadata) -> Result<(), FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            return Err(FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            });
        }

        if metadata.size == 0 {
            return Err(FileProcessorError::EmptyFile {
                path: metadata.path.display().to_string(),
            });
        }

        if self.require_cepl_extension && !metadata.is_cepl_file {
            return Err(FileProcessorError::InvalidExtension {
                extension: metadata.extension.clone(),
            });
        }

        Ok(())
    }

    fn log_processing_success(&self, result: &FileProcessingResult) {
        let file = result.metadata.path.display();
        if self.enable_performance_logging {
            crate::log_performance!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File processed successfully",
                duration = result.processing_duration,
                "file" => file,
                "size" => result.metadata.human_readable_size(),
                "lines" => result.metadata.line_count,
                "chars" => result.char_count()
            );
        } else {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File processed successfully",
                "file" => file
            );
        }
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_process_valid_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("query.cepl");
        let content = "# two relations\nA as a : B as b\n";
        fs::write(&file_path, content).unwrap();

        let result = FileProcessor::new().process_file(&file_path).unwrap();

        assert_eq!(result.source, content);
        assert_eq!(result.metadata.line_count, 2);
        assert!(result.metadata.is_cepl_file);
        assert_eq!(result.metadata.size, content.len() as u64);
        assert_eq!(result.char_count(), content.chars().count());
        assert!(!result.is_effectively_empty());
    }

    #[test]
    fn test_file_not_found() {
        let dir = tempdir().unwrap();
        let result = FileProcessor::new().process_file(&dir.path().join("missing.cepl"));
        let error = result.unwrap_err();
        assert_matches!(error, FileProcessorError::FileNotFound { .. });
        assert_eq!(error.error_code(), codes::file_processing::FILE_NOT_FOUND);
    }

    #[test]
    fn test_directory_and_empty_path_are_invalid() {
        let dir = tempdir().unwrap();
        let processor = FileProcessor::new();
        assert_matches!(
            processor.process_file(dir.path()),
            Err(FileProcessorError::InvalidPath { .. })
        );
        assert_matches!(
            processor.process_file(Path::new("")),
            Err(FileProcessorError::InvalidPath { .. })
        );
    }

    #[test]
    fn test_empty_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("empty.cepl");
        fs::write(&file_path, "").unwrap();

        assert_matches!(
            FileProcessor::new().process_file(&file_path),
            Err(FileProcessorError::EmptyFile { .. })
        );
    }

    #[test]
    fn test_file_size_limit() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("large.cepl");
        fs::write(&file_path, "a".repeat((MAX_FILE_SIZE + 1) as usize)).unwrap();

        match FileProcessor::new().process_file(&file_path) {
            Err(FileProcessorError::FileTooLarge { size, max_size }) => {
                assert!(size > MAX_FILE_SIZE);
                assert_eq!(max_size, MAX_FILE_SIZE);
            }
            other => panic!("Expected FileTooLarge error, got {:?}", other),
        }
    }

    #[test]
    fn test_extension_requirement() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("query.txt");
        fs::write(&file_path, "A as a").unwrap();

        assert!(FileProcessor::new()
            .with_cepl_extension_required(false)
            .process_file(&file_path)
            .is_ok());

        let result = FileProcessor::new()
            .with_cepl_extension_required(true)
            .process_file(&file_path);
        assert_matches!(
            result,
            Err(FileProcessorError::InvalidExtension { extension: Some(ref ext) }) if ext == "txt"
        );
    }

    #[test]
    fn test_invalid_utf8() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("binary.cepl");
        fs::write(&file_path, [0x41, 0xff, 0xfe, 0x20]).unwrap();

        assert_matches!(
            FileProcessor::new().process_file(&file_path),
            Err(FileProcessorError::InvalidEncoding { .. })
        );
    }

    #[test]
    fn test_line_limit() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("lines.cepl");
        fs::write(&file_path, "\n".repeat(MAX_LINE_COUNT + 1)).unwrap();

        assert_matches!(
            FileProcessor::new().process_file(&file_path),
            Err(FileProcessorError::TooManyLines { .. })
        );
    }

    #[test]
    fn test_human_readable_size() {
        let metadata = FileMetadata {
            path: PathBuf::from("q.cepl"),
            size: 2048,
            extension: Some("cepl".to_string()),
            line_count: 1,
            is_cepl_file: true,
        };
        assert_eq!(metadata.human_readable_size(), "2.00 KB");
    }
}
