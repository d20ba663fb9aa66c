// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::command::ProgramTable;
use crate::request::CommonOptions;
use crate::types::GenerationMode;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [launcher]
/// project_root = "/opt/skyreels"
/// interpreter = "python"
/// requirements = "requirements.txt"
///
/// [programs]
/// standard = "generate_video.py"
/// diffusion-forcing = "generate_video_df.py"
///
/// [defaults]
/// model_id = "Skywork/SkyReels-V2-T2V-14B-540P"
/// resolution = "540P"
/// num_frames = 97
///
/// [enhancer]
/// endpoint = "http://127.0.0.1:8000"
/// max_new_tokens = 2048
/// ```
///
/// Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub launcher: LauncherSection,

    /// Mode name → program path, relative to `launcher.project_root`.
    ///
    /// Empty means the built-in table.
    #[serde(default)]
    pub programs: BTreeMap<String, PathBuf>,

    #[serde(default)]
    pub defaults: DefaultsSection,

    #[serde(default)]
    pub enhancer: EnhancerSection,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub launcher: LauncherSection,
    /// Program table with paths already resolved against the project root.
    pub programs: ProgramTable,
    pub defaults: DefaultsSection,
    pub enhancer: EnhancerSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        launcher: LauncherSection,
        programs: ProgramTable,
        defaults: DefaultsSection,
        enhancer: EnhancerSection,
    ) -> Self {
        let programs = programs.rooted_at(&launcher.project_root);
        Self {
            launcher,
            programs,
            defaults,
            enhancer,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let mut launcher = LauncherSection::default();
        if let Ok(root) = std::path::absolute(&launcher.project_root) {
            launcher.project_root = root;
        }
        Self::new_unchecked(
            launcher,
            ProgramTable::default(),
            DefaultsSection::default(),
            EnhancerSection::default(),
        )
    }
}

/// `[launcher]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LauncherSection {
    /// Working directory of every child process; relative program paths
    /// resolve against it. Made absolute during validation.
    #[serde(default = "default_project_root")]
    pub project_root: PathBuf,

    /// Interpreter prepended to every program invocation. Empty runs the
    /// program directly.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Requirements file passed to the installer.
    #[serde(default = "default_requirements")]
    pub requirements: PathBuf,
}

fn default_project_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_interpreter() -> String {
    "python".to_string()
}

fn default_requirements() -> PathBuf {
    PathBuf::from("requirements.txt")
}

impl Default for LauncherSection {
    fn default() -> Self {
        Self {
            project_root: default_project_root(),
            interpreter: default_interpreter(),
            requirements: default_requirements(),
        }
    }
}

impl LauncherSection {
    pub fn interpreter(&self) -> Option<&str> {
        Some(self.interpreter.trim()).filter(|s| !s.is_empty())
    }
}

/// `[defaults]` section: values used when the user leaves an option unset.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsSection {
    #[serde(default = "default_mode")]
    pub mode: GenerationMode,

    #[serde(default = "default_model_id")]
    pub model_id: String,

    #[serde(flatten)]
    pub options: CommonOptions,
}

fn default_mode() -> GenerationMode {
    GenerationMode::Standard
}

fn default_model_id() -> String {
    crate::types::KNOWN_MODELS[0].to_string()
}

impl Default for DefaultsSection {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            model_id: default_model_id(),
            options: CommonOptions {
                resolution: Some("540P".to_string()),
                num_frames: Some("97".to_string()),
                guidance_scale: Some("6.0".to_string()),
                outdir: Some("video_out".to_string()),
                ..CommonOptions::default()
            },
        }
    }
}

/// `[enhancer]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EnhancerSection {
    /// Base URL of an OpenAI-compatible inference server.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_max_new_tokens() -> u32 {
    2048
}

impl Default for EnhancerSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            max_new_tokens: default_max_new_tokens(),
        }
    }
}
