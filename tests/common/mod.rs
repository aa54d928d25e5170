#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::{Compression, write::GzEncoder};
use tempfile::{TempDir, tempdir};

pub const METADATA_TSV: &str = "\
sample_alias\trun_accession\tage\tbmi
a\tERR1\t41\t22.1
b\tERR2\t35\t30.0
c\tERR3\t52\tNA
";

pub const LONG_TAXONOMY_TSV: &str = "\
sample\tspecies\trel_abund
a\ts__Bacteroides_uniformis\t0.3
a\ts__Prevotella_copri\t0.2
b\ts__Bacteroides_uniformis\t0.7
z\ts__Prevotella_copri\t0.9
";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes `contents` gzip-compressed, keeping whatever extension `name` has.
    pub fn write_gzip(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let file = File::create(&path).expect("create temp file");
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(contents.as_bytes())
            .expect("write gzip contents");
        encoder.finish().expect("finish gzip stream");
        path
    }
}
