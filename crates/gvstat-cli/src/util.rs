use std::{
    fs::{self, File},
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use gvstat_analysis::cache::{ArtifactCache, Fingerprint};
use gvstat_data::{
    dataset::RoleTable,
    incident::{self, Incident},
    participant::Role,
};
use serde::{Serialize, de::DeserializeOwned};

/// Path argument that selects stdout instead of a file.
pub const STDOUT_PATH: &str = "-";

/// Destination of a command's JSON report.
#[derive(Debug)]
pub struct JsonOutput {
    sink: Sink,
    label: String,
}

#[derive(Debug)]
enum Sink {
    Stdout(StdoutLock<'static>),
    File(BufWriter<File>),
}

impl JsonOutput {
    /// Stdout when `path` is absent or `-`, otherwise a new file.
    ///
    /// Missing parent directories of the file are created.
    pub fn open(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path.filter(|p| p.as_os_str() != STDOUT_PATH) else {
            return Ok(Self {
                sink: Sink::Stdout(io::stdout().lock()),
                label: "stdout".to_owned(),
            });
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self {
            sink: Sink::File(BufWriter::new(file)),
            label: path.display().to_string(),
        })
    }

    /// Writes `value` as pretty JSON followed by a newline.
    pub fn write<T>(mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let label = self.label;
        let writer: &mut dyn io::Write = match &mut self.sink {
            Sink::Stdout(writer) => writer,
            Sink::File(writer) => writer,
        };
        serde_json::to_writer_pretty(&mut *writer, value)
            .with_context(|| format!("Failed to write JSON to {label}"))?;
        writeln!(writer).with_context(|| format!("Failed to write JSON to {label}"))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush output to {label}"))?;
        if let Sink::File(_) = self.sink {
            log::info!("wrote {label}");
        }
        Ok(())
    }
}

/// Writes a command's report to `path`, or to stdout.
pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
{
    JsonOutput::open(path)?.write(value)
}

/// Read a victim or suspect table from a CSV file
pub fn read_role_table<P>(role: Role, path: P) -> anyhow::Result<RoleTable>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    RoleTable::read(role, path)
        .with_context(|| format!("Failed to load {role} table: {}", path.display()))
}

/// Read the raw incident dataset from a CSV file
pub fn read_incidents_file<P>(path: P) -> anyhow::Result<Vec<Incident>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    incident::read_incidents(path)
        .with_context(|| format!("Failed to load incidents: {}", path.display()))
}

/// Compute an artifact, going through the cache file when one is given
pub fn compute_cached<T, F>(
    cache_path: Option<&Path>,
    fingerprint: impl FnOnce() -> anyhow::Result<Fingerprint>,
    compute: F,
) -> anyhow::Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> anyhow::Result<T>,
{
    let Some(cache_path) = cache_path else {
        return compute();
    };
    let fingerprint = fingerprint()?;
    log::debug!("input fingerprint: {fingerprint}");
    ArtifactCache::new(cache_path).load_or_compute(&fingerprint, compute)
}
