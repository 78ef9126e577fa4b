//! Sanity checks on the device path before anything is downloaded.

use crate::error::{FlashError, Result};
use std::path::{Path, PathBuf};

const USER_WRITE: u32 = 0o200;
const GROUP_WRITE: u32 = 0o020;
const OTHER_WRITE: u32 = 0o002;

/// Checks that `path` is absolute, exists, and is writable by this process
/// according to its owner/group/other permission bits.
pub fn validate_destination(path: &Path) -> Result<PathBuf> {
    let reject = |reason: String| FlashError::Destination {
        path: path.to_path_buf(),
        reason,
    };

    if !path.is_absolute() {
        return Err(reject("must be an absolute path".to_string()));
    }
    let meta = std::fs::metadata(path).map_err(|e| reject(e.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        // SAFETY: getuid/getgid cannot fail and touch no memory.
        let (uid, gid) = unsafe { (libc::getuid(), libc::getgid()) };
        if !may_write(meta.mode(), meta.uid(), meta.gid(), uid, gid) {
            return Err(reject("permission denied: cannot write".to_string()));
        }
    }
    #[cfg(not(unix))]
    let _ = meta;

    tracing::debug!(path = %path.display(), "destination validated");
    Ok(path.to_path_buf())
}

/// Write permission from the mode bits alone.
///
/// Owner bits apply when `uid` owns the file, group bits when `gid` matches,
/// and other bits always. Root gets no special treatment.
pub fn may_write(mode: u32, file_uid: u32, file_gid: u32, uid: u32, gid: u32) -> bool {
    (uid == file_uid && mode & USER_WRITE != 0)
        || (gid == file_gid && mode & GROUP_WRITE != 0)
        || mode & OTHER_WRITE != 0
}
