use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::TempDir;
use thiserror::Error;

use crate::calculation::ResultArtifact;
use crate::parsers::errors::XyzHeaderError;
use crate::parsers::xyz::validate_header;

/// An opened geometry file, named after its base name.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedGeometry {
    pub ligand_name: String,
    pub content: String,
    pub declared_atom_count: usize,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Could not read the file: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Header(#[from] XyzHeaderError),
}

impl UploadedGeometry {
    /// Accept a geometry whose header passes validation.
    pub fn from_text(
        ligand_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<UploadedGeometry, XyzHeaderError> {
        let content = content.into();
        let declared_atom_count = validate_header(&content)?;
        Ok(UploadedGeometry {
            ligand_name: ligand_name.into(),
            content,
            declared_atom_count,
        })
    }

    pub fn load(path: &Path) -> Result<UploadedGeometry, UploadError> {
        let content = fs::read_to_string(path)?;
        let ligand_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("ligand"));
        Ok(UploadedGeometry::from_text(ligand_name, content)?)
    }
}

/// Session-scoped mutable state: the cached result of the latest run and
/// a temporary staging directory.
///
/// Both start out absent. The directory appears lazily the first time an
/// upload is staged; `reset` tears the pair down exactly once and a later
/// upload starts the cycle again.
#[derive(Default)]
pub struct SessionContext {
    staging_dir: Option<TempDir>,
    result: Option<ResultArtifact>,
}

impl SessionContext {
    pub fn new() -> SessionContext {
        SessionContext::default()
    }

    /// Copy an uploaded geometry into the session staging directory.
    pub fn stage_upload(&mut self, geometry: &UploadedGeometry) -> io::Result<PathBuf> {
        let dir = self.staging_dir()?;
        let path = dir.join(format!("{}.xyz", geometry.ligand_name));
        fs::write(&path, &geometry.content)?;
        debug!("Staged {} at {}", geometry.ligand_name, path.display());
        Ok(path)
    }

    fn staging_dir(&mut self) -> io::Result<PathBuf> {
        if let Some(ref dir) = self.staging_dir {
            return Ok(dir.path().to_path_buf());
        }
        let dir = TempDir::new()?;
        info!("Session staging directory at {}", dir.path().display());
        let path = dir.path().to_path_buf();
        self.staging_dir = Some(dir);
        Ok(path)
    }

    /// Cache the result of the latest run, replacing any previous one.
    pub fn store_result(&mut self, result: ResultArtifact) {
        self.result = Some(result);
    }

    pub fn result(&self) -> Option<&ResultArtifact> {
        self.result.as_ref()
    }

    /// Discard the cached result and tear down the staging directory.
    pub fn reset(&mut self) {
        if let Some(dir) = self.staging_dir.take() {
            let path = dir.path().to_path_buf();
            if let Err(error) = dir.close() {
                debug!("Could not remove {}: {error}", path.display());
            }
        }
        self.result = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some_geometry() -> UploadedGeometry {
        UploadedGeometry::from_text("water", "3\nWater\nO 0.0 0.0 0.0\n").unwrap()
    }

    fn some_result() -> ResultArtifact {
        ResultArtifact {
            ligand_name: String::from("water"),
            fraction_buried_volume: 0.5,
            steric_map_png: vec![1, 2, 3],
            report: vec![4, 5, 6],
        }
    }

    #[test]
    fn test_the_ligand_name_is_the_file_stem() {
        let path = Path::new(crate::test_ressource!("pd-pme3.xyz"));
        let geometry = UploadedGeometry::load(path).unwrap();
        assert_eq!(geometry.ligand_name, "pd-pme3");
        assert_eq!(geometry.declared_atom_count, 14);
    }

    #[test]
    fn test_a_bad_header_rejects_the_upload() {
        let rejected = UploadedGeometry::from_text("broken", "not a count\ntitle\n");
        assert!(matches!(rejected, Err(XyzHeaderError::NotACount(_))));
    }

    #[test]
    fn test_staging_is_lazy_and_reset_tears_it_down() {
        let mut session = SessionContext::new();
        let staged = session.stage_upload(&some_geometry()).unwrap();
        assert!(staged.exists());
        session.store_result(some_result());
        assert!(session.result().is_some());

        session.reset();
        assert!(!staged.exists());
        assert!(session.result().is_none());

        // A reset session accepts a new cycle.
        session.reset();
        let staged_again = session.stage_upload(&some_geometry()).unwrap();
        assert_ne!(staged, staged_again);
        assert!(staged_again.exists());
    }

    #[test]
    fn test_a_new_result_replaces_the_previous_one() {
        let mut session = SessionContext::new();
        session.store_result(some_result());
        let mut replacement = some_result();
        replacement.fraction_buried_volume = 0.75;
        session.store_result(replacement.clone());
        assert_eq!(session.result(), Some(&replacement));
    }
}
