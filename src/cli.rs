// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::request::{CommonOptions, DiffusionForcingOptions};

/// Command-line arguments for `genlaunch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "genlaunch",
    version,
    about = "Configure and launch video-generation programs, streaming their output.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Genlaunch.toml` in the current working directory, or
    /// built-in defaults if that file does not exist.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GENLAUNCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Build the command line for a generation run and execute it.
    Run(RunArgs),
    /// Install the project's Python requirements.
    Install,
    /// Expand a short prompt into a detailed caption.
    Enhance(EnhanceArgs),
    /// List known models and generation modes.
    Models,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Generation mode: "standard" or "diffusion-forcing".
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,

    #[arg(long, value_name = "ID")]
    pub model_id: Option<String>,

    #[arg(long, value_name = "TEXT", default_value = "")]
    pub prompt: String,

    #[arg(long)]
    pub resolution: Option<String>,
    #[arg(long)]
    pub num_frames: Option<String>,
    #[arg(long)]
    pub guidance_scale: Option<String>,
    #[arg(long, value_name = "DIR")]
    pub outdir: Option<String>,
    #[arg(long, value_name = "PATH")]
    pub image: Option<String>,
    #[arg(long)]
    pub shift: Option<String>,
    #[arg(long)]
    pub inference_steps: Option<String>,
    #[arg(long)]
    pub fps: Option<String>,
    #[arg(long)]
    pub seed: Option<String>,
    #[arg(long, overrides_with = "no_offload")]
    pub offload: bool,
    #[arg(long, overrides_with = "no_teacache")]
    pub teacache: bool,
    #[arg(long)]
    pub teacache_thresh: Option<String>,
    #[arg(long, overrides_with = "no_use_ret_steps")]
    pub use_ret_steps: bool,

    /// Turn off a flag that `[defaults]` enables.
    #[arg(long, overrides_with = "offload")]
    pub no_offload: bool,
    #[arg(long, overrides_with = "teacache")]
    pub no_teacache: bool,
    #[arg(long, overrides_with = "use_ret_steps")]
    pub no_use_ret_steps: bool,

    /// Diffusion-forcing only; ignored in other modes.
    #[arg(long, value_name = "PATH", help_heading = "Diffusion forcing")]
    pub video_path: Option<String>,
    #[arg(long, value_name = "PATH", help_heading = "Diffusion forcing")]
    pub end_image: Option<String>,
    #[arg(long, help_heading = "Diffusion forcing")]
    pub ar_step: Option<String>,
    #[arg(long, help_heading = "Diffusion forcing")]
    pub base_num_frames: Option<String>,
    #[arg(long, help_heading = "Diffusion forcing")]
    pub overlap_history: Option<String>,
    #[arg(long, help_heading = "Diffusion forcing")]
    pub addnoise_condition: Option<String>,
    #[arg(long, help_heading = "Diffusion forcing")]
    pub causal_block_size: Option<String>,
    #[arg(long, help_heading = "Diffusion forcing")]
    pub causal_attention: bool,

    /// Let the generation program enhance the prompt first.
    #[arg(long)]
    pub prompt_enhancer: bool,

    #[arg(long, value_enum, default_value_t = ModelSize::Small)]
    pub enhancer_model_size: ModelSize,

    /// Print the command line without executing it.
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    pub fn common_options(&self) -> CommonOptions {
        CommonOptions {
            resolution: self.resolution.clone(),
            num_frames: self.num_frames.clone(),
            guidance_scale: self.guidance_scale.clone(),
            outdir: self.outdir.clone(),
            image: self.image.clone(),
            shift: self.shift.clone(),
            inference_steps: self.inference_steps.clone(),
            fps: self.fps.clone(),
            seed: self.seed.clone(),
            offload: self.offload,
            teacache: self.teacache,
            teacache_thresh: self.teacache_thresh.clone(),
            use_ret_steps: self.use_ret_steps,
        }
    }

    /// Apply `--no-*` switches after config defaults have been merged in.
    pub fn clear_negated_flags(&self, common: &mut CommonOptions) {
        if self.no_offload {
            common.offload = false;
        }
        if self.no_teacache {
            common.teacache = false;
        }
        if self.no_use_ret_steps {
            common.use_ret_steps = false;
        }
    }

    pub fn diffusion_forcing_options(&self) -> DiffusionForcingOptions {
        DiffusionForcingOptions {
            video_path: self.video_path.clone(),
            end_image: self.end_image.clone(),
            ar_step: self.ar_step.clone(),
            base_num_frames: self.base_num_frames.clone(),
            overlap_history: self.overlap_history.clone(),
            addnoise_condition: self.addnoise_condition.clone(),
            causal_block_size: self.causal_block_size.clone(),
            causal_attention: self.causal_attention,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct EnhanceArgs {
    #[arg(long, value_name = "TEXT", default_value = "In a still frame, a stop sign")]
    pub prompt: String,

    #[arg(long = "model_size", visible_alias = "model-size", value_enum, default_value_t = ModelSize::Small)]
    pub model_size: ModelSize,

    /// Truncate the enhanced prompt to this many characters.
    #[arg(long = "max_length", visible_alias = "max-length", value_name = "N")]
    pub max_length: Option<usize>,

    /// Inference server base URL; overrides `[enhancer].endpoint`.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ModelSize {
    Small,
    Large,
}

impl From<ModelSize> for crate::types::EnhancerModelSize {
    fn from(size: ModelSize) -> Self {
        match size {
            ModelSize::Small => crate::types::EnhancerModelSize::Small,
            ModelSize::Large => crate::types::EnhancerModelSize::Large,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enhance_accepts_underscore_flags() {
        let args = CliArgs::try_parse_from([
            "genlaunch", "enhance", "--prompt", "a cat", "--model_size", "large", "--max_length", "40",
        ])
        .unwrap();
        match args.command {
            Command::Enhance(e) => {
                assert_eq!(e.prompt, "a cat");
                assert_eq!(e.model_size, ModelSize::Large);
                assert_eq!(e.max_length, Some(40));
            }
            other => panic!("expected enhance, got {other:?}"),
        }
    }

    #[test]
    fn run_collects_flags() {
        let args = CliArgs::try_parse_from([
            "genlaunch", "run", "--mode", "df", "--offload", "--ar-step", "5", "--dry-run",
        ])
        .unwrap();
        let Command::Run(run) = args.command else {
            panic!("expected run");
        };
        assert!(run.dry_run);
        assert!(run.common_options().offload);
        assert_eq!(run.diffusion_forcing_options().ar_step.as_deref(), Some("5"));
    }

    #[test]
    fn last_of_flag_and_negation_wins() {
        let args = CliArgs::try_parse_from(["genlaunch", "run", "--offload", "--no-offload"]).unwrap();
        let Command::Run(run) = args.command else {
            panic!("expected run");
        };
        assert!(!run.offload);
        assert!(run.no_offload);
    }
}
