// src/command/builder.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{LaunchError, Result};
use crate::request::{GenerationRequest, OptionValue};
use crate::types::{GenerationMode, OptionGroup};

/// Static mode → program mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramTable {
    programs: BTreeMap<GenerationMode, PathBuf>,
}

impl ProgramTable {
    /// An empty table; every mode is unknown until registered.
    pub fn empty() -> Self {
        Self {
            programs: BTreeMap::new(),
        }
    }

    pub fn with_program(mut self, mode: GenerationMode, program: impl Into<PathBuf>) -> Self {
        self.programs.insert(mode, program.into());
        self
    }

    pub fn insert(&mut self, mode: GenerationMode, program: impl Into<PathBuf>) {
        self.programs.insert(mode, program.into());
    }

    pub fn program_for(&self, mode: GenerationMode) -> Result<&Path> {
        self.programs
            .get(&mode)
            .map(PathBuf::as_path)
            .ok_or_else(|| LaunchError::UnknownMode(mode.to_string()))
    }

    /// Resolve every relative program path against `root`.
    pub fn rooted_at(&self, root: &Path) -> Self {
        let programs = self
            .programs
            .iter()
            .map(|(mode, program)| (*mode, root.join(program)))
            .collect();
        Self { programs }
    }

    pub fn iter(&self) -> impl Iterator<Item = (GenerationMode, &Path)> {
        self.programs.iter().map(|(m, p)| (*m, p.as_path()))
    }
}

impl Default for ProgramTable {
    fn default() -> Self {
        Self::empty()
            .with_program(GenerationMode::Standard, "generate_video.py")
            .with_program(GenerationMode::DiffusionForcing, "generate_video_df.py")
    }
}

/// Build the argument vector for `request`.
///
/// Layout: program, `--model_id`, common options, mode-specific options (only
/// when the mode enables them), `--prompt`, enhancer flags. Unset, blank and
/// false options are left out entirely.
pub fn build_arguments(request: &GenerationRequest, programs: &ProgramTable) -> Result<Vec<String>> {
    let program = programs.program_for(request.mode)?;

    let mut argv = vec![program.to_string_lossy().into_owned()];

    push_option(&mut argv, "model_id", &OptionValue::Text(Some(request.model_id.clone())));

    for (name, value) in request.common.entries() {
        push_option(&mut argv, name, &value);
    }

    if request.mode.uses_group(OptionGroup::DiffusionForcing) {
        for (name, value) in request.diffusion_forcing.entries() {
            push_option(&mut argv, name, &value);
        }
    } else {
        let dropped = request
            .diffusion_forcing
            .entries()
            .into_iter()
            .filter(|(_, v)| v.is_present())
            .count();
        if dropped > 0 {
            debug!(mode = %request.mode, dropped, "ignoring diffusion-forcing options for this mode");
        }
    }

    let prompt = request.prompt.trim();
    if !prompt.is_empty() {
        argv.push("--prompt".to_string());
        argv.push(prompt.to_string());
    }

    if let Some(enhancer) = request.enhancer {
        argv.push("--prompt_enhancer".to_string());
        argv.push("--prompt_enhancer_model_size".to_string());
        argv.push(enhancer.model_size.to_string());
    }

    Ok(argv)
}

fn push_option(argv: &mut Vec<String>, name: &str, value: &OptionValue) {
    if let Some(text) = value.emitted() {
        argv.push(format!("--{name}"));
        if let Some(text) = text {
            argv.push(text.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_rejects_every_mode() {
        let req = GenerationRequest::new(GenerationMode::Standard, "M");
        match build_arguments(&req, &ProgramTable::empty()) {
            Err(LaunchError::UnknownMode(mode)) => assert_eq!(mode, "standard"),
            other => panic!("expected UnknownMode, got {other:?}"),
        }
    }

    #[test]
    fn empty_model_id_is_omitted() {
        let req = GenerationRequest::new(GenerationMode::Standard, "");
        let argv = build_arguments(&req, &ProgramTable::default()).unwrap();
        assert_eq!(argv, vec!["generate_video.py".to_string()]);
    }

    #[test]
    fn rooted_table_joins_relative_paths() {
        let table = ProgramTable::default().rooted_at(Path::new("/opt/sky"));
        assert_eq!(
            table.program_for(GenerationMode::DiffusionForcing).unwrap(),
            Path::new("/opt/sky/generate_video_df.py")
        );
    }
}
