//! Byte sources the reader pulls files from.

use std::path::Path;

use crate::error::{IngestError, Result};

/// Maximum file size for CSV loading (500 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Something that can hand out the full contents of a file.
///
/// Every call is a fresh read; implementations keep no per-path state.
pub trait ByteSource: Send + Sync {
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>>;
}

impl<T: ByteSource + ?Sized> ByteSource for &T {
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        (**self).read_bytes(path)
    }
}

/// Reads files from the local filesystem, refusing oversized ones.
#[derive(Debug, Clone, Copy)]
pub struct FileSystemSource {
    max_file_bytes: u64,
}

impl FileSystemSource {
    pub fn new(max_file_bytes: u64) -> Self {
        Self { max_file_bytes }
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }
}

impl Default for FileSystemSource {
    fn default() -> Self {
        Self::new(MAX_CSV_FILE_SIZE)
    }
}

impl ByteSource for FileSystemSource {
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        check_file_size_with_limit(path, self.max_file_bytes)?;
        std::fs::read(path).map_err(|source| IngestError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Check file size against a limit before reading it.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|source| IngestError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}
