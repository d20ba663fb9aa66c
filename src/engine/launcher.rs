// src/engine/launcher.rs

use std::path::{Path, PathBuf};

use tracing::info;

use crate::command::{ProgramTable, build_arguments, installer_arguments};
use crate::config::ConfigFile;
use crate::errors::Result;
use crate::exec::{ProcessBackend, ProcessHandle, RealProcessBackend, RunObserver};
use crate::request::GenerationRequest;

/// Turns requests into running processes.
///
/// Holds the validated launcher settings and delegates process creation to a
/// [`ProcessBackend`], so tests can observe exactly what would be spawned.
pub struct Launcher<B: ProcessBackend = RealProcessBackend> {
    project_root: PathBuf,
    interpreter: Option<String>,
    requirements: PathBuf,
    programs: ProgramTable,
    backend: B,
}

impl Launcher<RealProcessBackend> {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self::with_backend(cfg, RealProcessBackend)
    }
}

impl<B: ProcessBackend> Launcher<B> {
    pub fn with_backend(cfg: &ConfigFile, backend: B) -> Self {
        Self {
            project_root: cfg.launcher.project_root.clone(),
            interpreter: cfg.launcher.interpreter().map(str::to_string),
            requirements: cfg.launcher.requirements.clone(),
            programs: cfg.programs.clone(),
            backend,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Full command line for `request`, interpreter included.
    pub fn command_for(&self, request: &GenerationRequest) -> Result<Vec<String>> {
        let argv = build_arguments(request, &self.programs)?;
        Ok(match &self.interpreter {
            Some(python) => std::iter::once(python.clone()).chain(argv).collect(),
            None => argv,
        })
    }

    pub fn install_command(&self) -> Vec<String> {
        installer_arguments(self.interpreter.as_deref(), &self.requirements)
    }

    pub fn launch(&self, request: &GenerationRequest, observer: Box<dyn RunObserver>) -> Result<ProcessHandle> {
        let argv = self.command_for(request)?;
        info!(mode = %request.mode, model = %request.model_id, "launching generation");
        self.backend.start(argv, &self.project_root, observer)
    }

    pub fn install_dependencies(&self, observer: Box<dyn RunObserver>) -> Result<ProcessHandle> {
        let argv = self.install_command();
        info!(requirements = %self.requirements.display(), "installing dependencies");
        self.backend.start(argv, &self.project_root, observer)
    }
}
