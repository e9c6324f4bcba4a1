//! File reading capability injected into the resolver.

use phz_common::limits::MAX_SOURCE_FILE_BYTES;
use std::io;
use std::path::Path;

/// Reads source files. Swappable so tests can count or fake reads.
pub trait FileReader: Send + Sync {
    fn read_file(&self, path: &Path) -> io::Result<String>;
}

/// Reads from the local file system. Files larger than
/// `MAX_SOURCE_FILE_BYTES` are refused.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsFileReader;

impl FileReader for FsFileReader {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        let metadata = std::fs::metadata(path)?;
        if metadata.len() > MAX_SOURCE_FILE_BYTES as u64 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "{} is larger than {MAX_SOURCE_FILE_BYTES} bytes",
                    path.display()
                ),
            ));
        }
        std::fs::read_to_string(path)
    }
}
