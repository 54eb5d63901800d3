//! Port traits abstracting artifact I/O away from the pipeline.

use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}

/// File-system backed `WritePort`.
#[derive(Debug, Clone, Default)]
pub struct FsWriter;

impl WritePort for FsWriter {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path).with_context(|| format!("create {}", path))
    }
}
