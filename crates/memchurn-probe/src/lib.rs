//! Process memory probe for memchurn.
//!
//! [`MemoryProbe`] copies the kernel's process status text verbatim to
//! an output stream. It does not parse anything: whoever reads the output
//! picks out `VmRSS`, `VmHWM` and friends themselves. On systems without
//! the status file the probe prints nothing.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Status file of the current process on Linux.
pub const PROC_SELF_STATUS: &str = "/proc/self/status";

/// Dumps a process status file to a writer.
#[derive(Clone, Debug)]
pub struct MemoryProbe {
    path: PathBuf,
}

impl MemoryProbe {
    /// Probe reading [`PROC_SELF_STATUS`].
    pub fn new() -> Self {
        Self::at(PROC_SELF_STATUS)
    }

    /// Probe reading an arbitrary file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this probe reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy the status file to `out` and return the number of bytes copied.
    ///
    /// If the file cannot be opened nothing is written and `Ok(0)` is
    /// returned. Errors while reading or writing are propagated.
    pub fn report<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<u64> {
        let mut file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                log::debug!("memory probe skipped, {}: {e}", self.path.display());
                return Ok(0);
            }
        };
        let copied = io::copy(&mut file, out)?;
        out.flush()?;
        Ok(copied)
    }
}

impl Default for MemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}
