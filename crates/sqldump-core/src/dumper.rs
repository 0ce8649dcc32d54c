//! Dump orchestrator.
//!
//! A dump runs start to finish without retries:
//!
//! 1. resolve the artifact name from the current time
//! 2. refuse if an artifact with that name exists
//! 3. open the destination (the artifact itself, or a staging file)
//! 4. fetch the server version, list tables, build every table record
//! 5. render the document and write it out
//!
//! The first failure ends the dump. The caller gets the artifact path back
//! either way and must look at the error to know whether the file is usable.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};

use crate::config::{ConfigError, DumperConfig, WriteMode};
use crate::document::{Document, DocumentBuilder};
use crate::error::{DumpError, DumpFailure, DumpResult};
use crate::executor::QueryExecutor;
use crate::render;
use crate::schema;
use crate::table;

/// Produces dump artifacts from one executor.
///
/// The executor is owned for the lifetime of the dumper and released by
/// [`Dumper::close`]. After closing, every call fails with [`DumpError::Closed`].
#[derive(Debug)]
pub struct Dumper<E: QueryExecutor> {
    executor: E,
    config: DumperConfig,
    closed: bool,
}

impl<E: QueryExecutor> Dumper<E> {
    /// Create a dumper, validating the destination directory and name pattern.
    pub fn new(executor: E, config: DumperConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::debug!(
            dir = ?config.dir,
            name_format = %config.name_format,
            with_row_data = config.with_row_data,
            write_mode = %config.write_mode,
            "Registered dumper"
        );
        Ok(Self {
            executor,
            config,
            closed: false,
        })
    }

    /// Shorthand for [`Dumper::new`] with direct writes.
    pub fn register(
        executor: E,
        dir: impl Into<PathBuf>,
        name_format: impl Into<String>,
        with_row_data: bool,
    ) -> Result<Self, ConfigError> {
        Self::new(executor, DumperConfig::new(dir, name_format, with_row_data))
    }

    pub fn config(&self) -> &DumperConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Produce a dump named after the current local time.
    pub fn dump(&mut self) -> Result<PathBuf, DumpFailure> {
        self.dump_at(Local::now())
    }

    /// Produce a dump named after `now`.
    #[tracing::instrument(
        skip(self, now),
        fields(dir = %self.config.dir.display(), write_mode = %self.config.write_mode)
    )]
    pub fn dump_at<Tz>(&mut self, now: DateTime<Tz>) -> Result<PathBuf, DumpFailure>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let path = match self.config.artifact_path(&now) {
            Ok(path) => path,
            Err(e) => return Err(DumpFailure::new(self.config.dir.clone(), e.into())),
        };

        match self.run(&path) {
            Ok(()) => {
                tracing::info!(path = ?path, "Dump completed");
                Ok(path)
            }
            Err(source) => {
                tracing::error!(path = ?path, error = %source, "Dump failed");
                Err(DumpFailure::new(path, source))
            }
        }
    }

    /// Close the executor. The dumper is unusable afterwards, even if the
    /// executor reports an error while closing.
    pub fn close(&mut self) -> DumpResult<()> {
        if self.closed {
            return Err(DumpError::Closed);
        }
        self.closed = true;
        self.executor.close()?;
        tracing::debug!("Dumper closed");
        Ok(())
    }

    fn run(&mut self, path: &Path) -> DumpResult<()> {
        if self.closed {
            return Err(DumpError::Closed);
        }
        ensure_absent(path)?;

        match self.config.write_mode {
            WriteMode::Direct => {
                let mut file = create_artifact(path)?;
                let rendered = render::render(&self.build_document()?)?;
                write_artifact(&mut file, &rendered)?;
            }
            WriteMode::Staged => {
                let mut staged = tempfile::Builder::new()
                    .prefix(".sqldump-")
                    .suffix(".partial")
                    .tempfile_in(&self.config.dir)?;
                tracing::debug!(staging = ?staged.path(), "Opened staging file");

                let rendered = render::render(&self.build_document()?)?;
                write_artifact(staged.as_file_mut(), &rendered)?;
                staged
                    .persist_noclobber(path)
                    .map_err(|e| creation_error(path, e.error))?;
            }
        }
        Ok(())
    }

    fn build_document(&mut self) -> DumpResult<Document> {
        let server_version = schema::server_version(&mut self.executor)?;
        tracing::debug!(server_version = %server_version, "Fetched server version");

        let tables = schema::list_tables(&mut self.executor)?;
        let mut builder = DocumentBuilder::new(server_version, self.config.with_row_data);

        for name in &tables {
            let record = table::describe_table(&mut self.executor, name, self.config.with_row_data)?;
            tracing::debug!(table = %name, value_bytes = record.values().len(), "Built table record");
            builder.push(record);
        }

        let document = builder.finish(Local::now().to_rfc3339());
        tracing::debug!(tables = document.tables().len(), "Built dump document");
        Ok(document)
    }
}

fn ensure_absent(path: &Path) -> DumpResult<()> {
    if path.try_exists()? {
        return Err(duplicate(path));
    }
    Ok(())
}

fn create_artifact(path: &Path) -> DumpResult<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| creation_error(path, e))
}

fn write_artifact(file: &mut File, rendered: &str) -> io::Result<()> {
    file.write_all(rendered.as_bytes())?;
    file.sync_all()
}

/// A concurrent writer can still claim the name between the existence check
/// and file creation; report that as the same conflict.
fn creation_error(path: &Path, err: io::Error) -> DumpError {
    if err.kind() == io::ErrorKind::AlreadyExists {
        duplicate(path)
    } else {
        DumpError::Io(err)
    }
}

fn duplicate(path: &Path) -> DumpError {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    DumpError::DuplicateDump {
        name,
        path: path.to_path_buf(),
    }
}
