// src/lib.rs

pub mod cli;
pub mod command;
pub mod config;
pub mod engine;
pub mod enhance;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod request;
pub mod types;

use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::{CliArgs, Command, EnhanceArgs, RunArgs};
use crate::config::ConfigFile;
use crate::config::load_or_default;
use crate::engine::{LaunchSession, Launcher};
use crate::enhance::{HttpLanguageModel, PromptEnhancer, truncate_chars};
use crate::errors::{LaunchError, Result};
use crate::exec::{ConsoleObserver, ProcessHandle, RunState};
use crate::request::{EnhancerOptions, GenerationRequest};
use crate::types::{GenerationMode, KNOWN_MODELS};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - request construction from CLI flags + config defaults
/// - launcher / process runner
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref())?;
    debug!(?cfg, "configuration loaded");

    match args.command {
        Command::Run(run_args) => run_generation(&cfg, &run_args).await,
        Command::Install => install(&cfg).await,
        Command::Enhance(enhance_args) => enhance(&cfg, &enhance_args).await,
        Command::Models => {
            print_models();
            Ok(())
        }
    }
}

/// Build the request for a `run` invocation: CLI values win, config
/// `[defaults]` fill the gaps. Flags enabled by `[defaults]` can only be
/// turned off with their `--no-*` switch.
pub fn request_from_args(cfg: &ConfigFile, args: &RunArgs) -> Result<GenerationRequest> {
    let mode = match args.mode.as_deref() {
        Some(m) => m.parse::<GenerationMode>()?,
        None => cfg.defaults.mode,
    };

    let model_id = args
        .model_id
        .clone()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| cfg.defaults.model_id.clone());

    let mut common = args.common_options().or_defaults(&cfg.defaults.options);
    args.clear_negated_flags(&mut common);

    Ok(GenerationRequest {
        mode,
        model_id,
        prompt: args.prompt.clone(),
        common,
        diffusion_forcing: args.diffusion_forcing_options(),
        enhancer: args.prompt_enhancer.then(|| EnhancerOptions {
            model_size: args.enhancer_model_size.into(),
        }),
    })
}

async fn run_generation(cfg: &ConfigFile, args: &RunArgs) -> Result<()> {
    let request = request_from_args(cfg, args)?;
    let mut session = LaunchSession::new(Launcher::from_config(cfg));

    if args.dry_run {
        print_dry_run(session.launcher(), &request)?;
        return Ok(());
    }

    let handle = session.launch(&request, Box::new(ConsoleObserver))?;
    finish(handle).await
}

async fn install(cfg: &ConfigFile) -> Result<()> {
    let mut session = LaunchSession::new(Launcher::from_config(cfg));
    let handle = session.install_dependencies(Box::new(ConsoleObserver))?;
    finish(handle).await
}

/// Wait for a run, cancelling it on Ctrl-C, and map failure to an error.
async fn finish(handle: Arc<ProcessHandle>) -> Result<()> {
    {
        let handle = Arc::clone(&handle);
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("Ctrl+C received; cancelling run");
            handle.cancel();
        });
    }

    match handle.wait().await {
        RunState::Completed(0) => Ok(()),
        RunState::Completed(code) | RunState::Cancelled(code) => Err(LaunchError::NonZeroExit(code)),
        RunState::Running => Err(LaunchError::Other(anyhow::anyhow!(
            "process supervisor stopped before the run finished"
        ))),
    }
}

async fn enhance(cfg: &ConfigFile, args: &EnhanceArgs) -> Result<()> {
    let endpoint = args.endpoint.as_deref().unwrap_or(&cfg.enhancer.endpoint);
    let model = Arc::new(HttpLanguageModel::new(endpoint)?);

    let enhancer = match PromptEnhancer::load(model, args.model_size.into(), cfg.enhancer.max_new_tokens).await {
        Ok(enhancer) => enhancer,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };

    let enhanced = enhancer.enhance(&args.prompt).await;
    let enhanced = truncate_chars(&enhanced, args.max_length);

    println!("Original prompt: {}", args.prompt);
    println!("Enhanced prompt: {enhanced}");
    Ok(())
}

fn print_dry_run<B: exec::ProcessBackend>(launcher: &Launcher<B>, request: &GenerationRequest) -> Result<()> {
    let argv = launcher.command_for(request)?;
    println!("genlaunch dry-run");
    println!("  cwd: {}", launcher.project_root().display());
    println!("  argv:");
    for arg in &argv {
        println!("    {arg}");
    }
    Ok(())
}

fn print_models() {
    println!("models:");
    for model in KNOWN_MODELS {
        println!("  - {model}");
    }
    println!();
    println!("modes:");
    for mode in GenerationMode::ALL {
        println!("  - {mode} (option groups: {:?})", mode.option_groups());
    }
}
