#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use genlaunch::config::{
    ConfigFile, DefaultsSection, EnhancerSection, LauncherSection, RawConfigFile,
};
use genlaunch::request::{EnhancerOptions, GenerationRequest};
use genlaunch::types::{EnhancerModelSize, GenerationMode};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                launcher: LauncherSection::default(),
                programs: BTreeMap::new(),
                defaults: DefaultsSection::default(),
                enhancer: EnhancerSection::default(),
            },
        }
    }

    pub fn project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.launcher.project_root = root.into();
        self
    }

    pub fn interpreter(mut self, interpreter: &str) -> Self {
        self.config.launcher.interpreter = interpreter.to_string();
        self
    }

    pub fn requirements(mut self, path: &str) -> Self {
        self.config.launcher.requirements = PathBuf::from(path);
        self
    }

    pub fn program(mut self, mode: &str, path: &str) -> Self {
        self.config.programs.insert(mode.to_string(), PathBuf::from(path));
        self
    }

    pub fn default_resolution(mut self, resolution: &str) -> Self {
        self.config.defaults.options.resolution = Some(resolution.to_string());
        self
    }

    pub fn default_offload(mut self, offload: bool) -> Self {
        self.config.defaults.options.offload = offload;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `GenerationRequest`.
pub struct RequestBuilder {
    request: GenerationRequest,
}

impl RequestBuilder {
    pub fn new(mode: GenerationMode, model_id: &str) -> Self {
        Self {
            request: GenerationRequest::new(mode, model_id),
        }
    }

    pub fn standard(model_id: &str) -> Self {
        Self::new(GenerationMode::Standard, model_id)
    }

    pub fn diffusion_forcing(model_id: &str) -> Self {
        Self::new(GenerationMode::DiffusionForcing, model_id)
    }

    pub fn prompt(mut self, prompt: &str) -> Self {
        self.request.prompt = prompt.to_string();
        self
    }

    pub fn resolution(mut self, v: &str) -> Self {
        self.request.common.resolution = Some(v.to_string());
        self
    }

    pub fn num_frames(mut self, v: &str) -> Self {
        self.request.common.num_frames = Some(v.to_string());
        self
    }

    pub fn guidance_scale(mut self, v: &str) -> Self {
        self.request.common.guidance_scale = Some(v.to_string());
        self
    }

    pub fn outdir(mut self, v: &str) -> Self {
        self.request.common.outdir = Some(v.to_string());
        self
    }

    pub fn image(mut self, v: &str) -> Self {
        self.request.common.image = Some(v.to_string());
        self
    }

    pub fn offload(mut self, v: bool) -> Self {
        self.request.common.offload = v;
        self
    }

    pub fn teacache(mut self, thresh: &str) -> Self {
        self.request.common.teacache = true;
        self.request.common.teacache_thresh = Some(thresh.to_string());
        self
    }

    pub fn ar_step(mut self, v: &str) -> Self {
        self.request.diffusion_forcing.ar_step = Some(v.to_string());
        self
    }

    pub fn video_path(mut self, v: &str) -> Self {
        self.request.diffusion_forcing.video_path = Some(v.to_string());
        self
    }

    pub fn causal_block_size(mut self, v: &str) -> Self {
        self.request.diffusion_forcing.causal_block_size = Some(v.to_string());
        self
    }

    pub fn causal_attention(mut self, v: bool) -> Self {
        self.request.diffusion_forcing.causal_attention = v;
        self
    }

    pub fn enhancer(mut self, size: EnhancerModelSize) -> Self {
        self.request.enhancer = Some(EnhancerOptions { model_size: size });
        self
    }

    pub fn build(self) -> GenerationRequest {
        self.request
    }
}
