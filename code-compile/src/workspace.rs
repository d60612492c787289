//! Per-provider files inside a caller supplied scratch directory.
//!
//! Names are random v4 UUIDs and the source file is opened with
//! `create_new`, so concurrent providers sharing one directory never write
//! over each other's files. No directory locking is done.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{error::Error, types::SourceLayout, Result};

const MAX_NAME_ATTEMPTS: usize = 8;

/// Fails with `WorkDirMissing` when `dir` does not exist
pub async fn check_work_directory(dir: &Path) -> Result<()> {
    match fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::Io(std::io::Error::new(
            ErrorKind::InvalidInput,
            format!("{} is not a directory", dir.display()),
        ))),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::WorkDirMissing(dir.to_path_buf())),
        Err(e) => Err(Error::Io(e)),
    }
}

/// The source and program files owned by one provider
#[derive(Debug, Clone)]
pub struct WorkArea {
    dir: PathBuf,
    source_name: String,
    source_path: PathBuf,
    program_name: String,
    program_path: PathBuf,
}

impl WorkArea {
    /// Allocates unique names for `layout` under `dir` and durably writes `source`
    pub async fn create(dir: &Path, layout: SourceLayout, source: &str) -> Result<Self> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let created = match layout {
                SourceLayout::Flat {
                    source_ext,
                    program_ext,
                } => Self::try_flat(dir, source_ext, program_ext, source).await?,
                SourceLayout::Nested { source_name } => {
                    Self::try_nested(dir, source_name, source).await?
                }
            };
            if let Some(area) = created {
                debug!(
                    "Work area ready - source: {}, program: {}",
                    area.source_path.display(),
                    area.program_path.display()
                );
                return Ok(area);
            }
        }

        Err(Error::System(format!(
            "could not allocate unique file names in {}",
            dir.display()
        )))
    }

    /// `Ok(None)` means a name collided and the caller should try again
    async fn try_flat(
        dir: &Path,
        source_ext: &str,
        program_ext: &str,
        source: &str,
    ) -> Result<Option<Self>> {
        let source_name = format!("{}{}", Uuid::new_v4(), source_ext);
        let program_name = format!("{}{}", Uuid::new_v4(), program_ext);
        let source_path = dir.join(&source_name);
        let program_path = dir.join(&program_name);

        if source_path == program_path || fs::try_exists(&program_path).await.unwrap_or(true) {
            return Ok(None);
        }

        match write_new(&source_path, source).await {
            Ok(()) => Ok(Some(Self {
                dir: dir.to_path_buf(),
                source_name,
                source_path,
                program_name,
                program_path,
            })),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(None),
            Err(e) => Err(Error::SourceWrite {
                path: source_path,
                source: e,
            }),
        }
    }

    async fn try_nested(dir: &Path, source_name: &str, source: &str) -> Result<Option<Self>> {
        let program_name = Uuid::new_v4().to_string();
        let program_path = dir.join(&program_name);

        match fs::create_dir(&program_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(None),
            Err(e) => {
                return Err(Error::SourceWrite {
                    path: program_path,
                    source: e,
                })
            }
        }

        let source_path = program_path.join(source_name);
        if let Err(e) = write_new(&source_path, source).await {
            remove_quietly(&program_path).await;
            return Err(Error::SourceWrite {
                path: source_path,
                source: e,
            });
        }

        Ok(Some(Self {
            dir: dir.to_path_buf(),
            source_name: source_name.to_string(),
            source_path,
            program_name,
            program_path,
        }))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    pub fn program_path(&self) -> &Path {
        &self.program_path
    }

    /// Removes both generated paths. Errors are logged, never returned.
    pub async fn clean(&self) {
        remove_quietly(&self.source_path).await;
        remove_quietly(&self.program_path).await;
    }

    /// Blocking variant of [`WorkArea::clean`] for use from `Drop`
    pub fn clean_blocking(&self) {
        remove_quietly_blocking(&self.source_path);
        remove_quietly_blocking(&self.program_path);
    }
}

async fn write_new(path: &Path, content: &str) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;

    let written = async {
        file.write_all(content.as_bytes()).await?;
        file.sync_all().await
    }
    .await;

    if written.is_err() {
        drop(file);
        let _ = fs::remove_file(path).await;
    }
    written
}

async fn remove_quietly(path: &Path) {
    let result = match fs::symlink_metadata(path).await {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path).await,
        Ok(_) => fs::remove_file(path).await,
        Err(e) => Err(e),
    };
    log_removal(path, result);
}

fn remove_quietly_blocking(path: &Path) {
    let result = match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path),
        Ok(_) => std::fs::remove_file(path),
        Err(e) => Err(e),
    };
    log_removal(path, result);
}

fn log_removal(path: &Path, result: std::io::Result<()>) {
    match result {
        Ok(()) => debug!("Removed {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
    }
}
