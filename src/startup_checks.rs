use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StartupCheckError {
    #[error("Directory not found at '{}'", .0.display())]
    InputDirectoryNotFound(PathBuf),

    #[error("Failed to create output directory {}: {source}", .path.display())]
    OutputDirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The output directory for a run, and whether this run created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirectory {
    pub path: PathBuf,
    pub created: bool,
}

pub fn validate_input_directory(input_dir: &Path) -> Result<(), StartupCheckError> {
    if input_dir.is_dir() {
        debug!("Input directory exists: {:?}", input_dir);
        Ok(())
    } else {
        Err(StartupCheckError::InputDirectoryNotFound(
            input_dir.to_path_buf(),
        ))
    }
}

/// `<input_dir>/<basename(input_dir)><suffix>`.
///
/// The base name is taken from the absolute path so that `.` and trailing
/// separators still produce a usable name.
pub fn output_directory_path(input_dir: &Path, suffix: &str) -> PathBuf {
    let absolute = std::path::absolute(input_dir).unwrap_or_else(|_| input_dir.to_path_buf());
    let mut names = Vec::new();
    for component in absolute.components() {
        match component {
            Component::Normal(name) => names.push(name.to_string_lossy().into_owned()),
            Component::ParentDir => {
                names.pop();
            }
            _ => {}
        }
    }
    let base = names.pop().unwrap_or_default();

    input_dir.join(format!("{}{}", base, suffix))
}

/// Create the output directory if needed. Existing directories are reused.
pub fn prepare_output_directory(
    input_dir: &Path,
    suffix: &str,
) -> Result<OutputDirectory, StartupCheckError> {
    let path = output_directory_path(input_dir, suffix);

    if path.is_dir() {
        debug!("Output directory exists: {:?}", path);
        return Ok(OutputDirectory {
            path,
            created: false,
        });
    }

    std::fs::create_dir_all(&path).map_err(|source| {
        StartupCheckError::OutputDirectoryCreationFailed {
            path: path.clone(),
            source,
        }
    })?;
    info!("Created output directory: {}", path.display());

    Ok(OutputDirectory {
        path,
        created: true,
    })
}
