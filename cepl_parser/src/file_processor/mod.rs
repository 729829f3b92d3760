//! File loading for the CEPL pipeline

mod processor;

pub use processor::{FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError};

use std::path::Path;

/// Process a file with default preferences
pub fn process_file(path: &Path) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new().process_file(path)
}
