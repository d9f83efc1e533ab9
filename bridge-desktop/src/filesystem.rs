//! File-backed byte sources using `std::fs`

use bridge_traits::{
    error::{BridgeError, Result},
    storage::{SourceHandle, SourceOpener},
};
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Opens raw PCM files relative to a media root directory.
///
/// Names are treated like paths on a removable card: a leading `/` refers to
/// the root of the media directory, not the host filesystem.
pub struct FsSourceOpener {
    root: PathBuf,
}

impl FsSourceOpener {
    /// Create an opener rooted at the platform audio directory.
    pub fn new() -> Self {
        let root = dirs::audio_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("Music")
        });

        Self { root }
    }

    /// Create an opener rooted at a custom directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory that names are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a source name to a path under the root.
    ///
    /// Names that would leave the root (`..`, drive prefixes) are rejected.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name.trim_start_matches(['/', '\\']));
        let mut path = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                _ => {
                    return Err(BridgeError::OperationFailed(format!(
                        "{} is outside the media root",
                        name
                    )))
                }
            }
        }
        Ok(path)
    }
}

impl Default for FsSourceOpener {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceOpener for FsSourceOpener {
    fn open(&self, name: &str) -> Result<Box<dyn SourceHandle>> {
        let path = self.resolve(name)?;
        let handle = FsSourceHandle::open(&path)?;
        debug!(path = ?path, size = handle.size, "Opened source file");
        Ok(Box::new(handle))
    }
}

/// An open file with its size captured at open time.
pub struct FsSourceHandle {
    file: File,
    size: u64,
    position: u64,
}

impl FsSourceHandle {
    /// Open a file directly by path.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let metadata = file.metadata()?;
        if metadata.is_dir() {
            return Err(BridgeError::OperationFailed(format!(
                "{} is a directory",
                path.display()
            )));
        }

        Ok(Self {
            file,
            size: metadata.len(),
            position: 0,
        })
    }

    /// Current read position in bytes.
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl SourceHandle for FsSourceHandle {
    fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        // Keep reading until the buffer is full so that only the tail of the
        // file produces a short count.
        let mut filled = 0;
        while filled < dst.len() {
            match self.file.read(&mut dst[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(BridgeError::Io(e)),
            }
        }
        self.position += filled as u64;
        Ok(filled)
    }

    fn available(&self) -> bool {
        self.position < self.size
    }

    fn seek(&mut self, offset: u64) -> Result<()> {
        if offset > self.size {
            return Err(BridgeError::OperationFailed(format!(
                "seek to {} past end of source ({} bytes)",
                offset, self.size
            )));
        }
        self.file.seek(SeekFrom::Start(offset))?;
        self.position = offset;
        Ok(())
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn close(self: Box<Self>) {
        debug!(position = self.position, size = self.size, "Closed source file");
    }
}
