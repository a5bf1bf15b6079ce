use std::path::Path;

use tokio::fs::{self, File};

/// Advisory whole-file lock, taken without blocking and released on drop.
///
/// Failing to take the lock never stops a transfer; the caller simply goes on
/// without one.
pub struct FileLock {
    #[cfg(unix)]
    file: std::fs::File,
}

impl FileLock {
    pub async fn try_acquire(file: &File) -> Option<FileLock> {
        let duplicate = match file.try_clone().await {
            Ok(duplicate) => duplicate.into_std().await,
            Err(e) => {
                debug!("Could not duplicate file handle for locking: {}", e);
                return None;
            }
        };

        FileLock::lock(duplicate)
    }

    #[cfg(unix)]
    fn lock(file: std::fs::File) -> Option<FileLock> {
        use std::os::unix::io::AsRawFd;

        let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
        if rc != 0 {
            debug!("File lock not acquired: {}", std::io::Error::last_os_error());
            return None;
        }

        Some(FileLock { file })
    }

    #[cfg(not(unix))]
    fn lock(_file: std::fs::File) -> Option<FileLock> {
        Some(FileLock {})
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;

            let rc = unsafe { libc::flock(self.file.as_raw_fd(), libc::LOCK_UN) };
            if rc != 0 {
                debug!("File unlock failed: {}", std::io::Error::last_os_error());
            }
        }
    }
}

/// Make a received file readable and writable by everyone. Best effort.
pub async fn mark_accessible(path: &Path) {
    let metadata = match fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(_) => return,
    };

    let mut permissions = metadata.permissions();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        permissions.set_mode(permissions.mode() | 0o666);
    }
    #[cfg(not(unix))]
    permissions.set_readonly(false);

    if let Err(e) = fs::set_permissions(path, permissions).await {
        debug!("Could not update permissions of {}: {}", path.display(), e);
    }
}
