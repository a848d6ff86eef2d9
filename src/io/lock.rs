use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const LOCK_FILE: &str = ".lock";
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long writers wait for the data directory before giving up
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Exclusive hold on a data directory.
///
/// The TUI save path and every CLI write command hold one across their whole
/// read-modify-write cycle. `<data_dir>/.lock` is created once and never removed:
/// every holder must flock the same inode. While held, the file contains the
/// holder's pid so a waiter that times out can say who is in the way.
pub struct DataDirLock {
    file: File,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("data directory {dir} is locked by {holder}")]
    Busy { dir: PathBuf, holder: String },
}

impl DataDirLock {
    /// Lock `data_dir`, polling until `timeout` runs out
    pub fn acquire(data_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = data_dir.join(LOCK_FILE);
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError::Open {
                path: path.clone(),
                source,
            })?;

        let start = Instant::now();
        while !try_lock(&file) {
            if start.elapsed() >= timeout {
                let holder = read_holder(&mut file)
                    .map(|pid| format!("process {}", pid))
                    .unwrap_or_else(|| "another stacktree process".to_string());
                tracing::warn!(dir = %data_dir.display(), %holder, "data directory lock timed out");
                return Err(LockError::Busy {
                    dir: data_dir.to_path_buf(),
                    holder,
                });
            }
            std::thread::sleep(POLL_INTERVAL);
        }

        if let Err(e) = write_holder(&mut file) {
            tracing::debug!(error = %e, "could not record lock holder");
        }
        Ok(DataDirLock { file })
    }
}

impl Drop for DataDirLock {
    fn drop(&mut self) {
        // Clear the pid while still holding; closing the descriptor releases the flock
        let _ = self.file.set_len(0);
    }
}

fn write_holder(file: &mut File) -> std::io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    write!(file, "{}", std::process::id())?;
    file.flush()
}

fn read_holder(file: &mut File) -> Option<u32> {
    let mut text = String::new();
    file.seek(SeekFrom::Start(0)).ok()?;
    file.read_to_string(&mut text).ok()?;
    text.trim().parse().ok()
}

#[cfg(unix)]
fn try_lock(file: &File) -> bool {
    use std::os::unix::io::AsRawFd;
    unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) == 0 }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> bool {
    true
}
