//! Scoped temporary files for one filter invocation.
//!
//! Both files get randomized names in the scratch directory and are removed
//! when [`ScratchFiles`] is dropped, on every exit path.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

/// Input and output file of a single filter run
pub struct ScratchFiles {
    input: NamedTempFile,
    output: NamedTempFile,
}

impl ScratchFiles {
    /// Create both files in `dir`, named `.<random><suffix>`.
    pub fn create(dir: &Path, suffix: &str) -> io::Result<Self> {
        let input = scratch_file(dir, suffix)?;
        let output = scratch_file(dir, suffix)?;
        Ok(Self { input, output })
    }

    pub fn input_path(&self) -> &Path {
        self.input.path()
    }

    pub fn output_path(&self) -> &Path {
        self.output.path()
    }

    /// Write the filter input and flush it to disk.
    pub fn write_input(&mut self, bytes: &[u8]) -> io::Result<()> {
        let file = self.input.as_file_mut();
        file.write_all(bytes)?;
        file.flush()
    }

    /// Fresh read handle on the input, positioned at the start
    pub fn stdin(&self) -> io::Result<File> {
        self.input.reopen()
    }

    /// Write handle on the (empty) output file
    pub fn stdout(&self) -> io::Result<File> {
        self.output.reopen()
    }

    /// Read back whatever the command wrote.
    pub fn read_output(&self) -> io::Result<Vec<u8>> {
        std::fs::read(self.output.path())
    }

    /// Remove both files now, logging instead of failing on errors.
    pub fn close(self) {
        for (role, file) in [("input", self.input), ("output", self.output)] {
            let path = file.path().to_path_buf();
            if let Err(e) = file.close() {
                tracing::warn!("Failed to remove {} scratch file {:?}: {}", role, path, e);
            }
        }
    }
}

fn scratch_file(dir: &Path, suffix: &str) -> io::Result<NamedTempFile> {
    Builder::new().prefix(".").suffix(suffix).tempfile_in(dir)
}
