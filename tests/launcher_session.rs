// tests/launcher_session.rs

use std::error::Error;
use std::path::Path;

use genlaunch::cli::CliArgs;
use genlaunch::engine::{LaunchSession, Launcher};
use genlaunch::errors::LaunchError;
use genlaunch::exec::RunState;
use genlaunch::request_from_args;
use genlaunch::types::GenerationMode;
use genlaunch_test_utils::builders::{ConfigFileBuilder, RequestBuilder};
use genlaunch_test_utils::fake_backend::FakeBackend;
use genlaunch_test_utils::recording::{Observed, RecordingObserver};
use genlaunch_test_utils::{init_tracing, with_timeout};

use clap::Parser;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn launcher_prepends_interpreter_and_uses_project_root() -> TestResult {
    init_tracing();

    let cfg = ConfigFileBuilder::new().project_root("/opt/sky").interpreter("python3").build();
    let launcher = Launcher::with_backend(&cfg, FakeBackend::completing(&["step 1\n"], 0));
    let observer = RecordingObserver::new();

    let req = RequestBuilder::standard("M").resolution("540P").prompt("cat").build();
    let handle = launcher.launch(&req, Box::new(observer.clone()))?;

    assert_eq!(handle.wait().await, RunState::Completed(0));
    let started = launcher.backend().started();
    assert_eq!(started.len(), 1);
    assert_eq!(
        started[0].argv,
        ["python3", "/opt/sky/generate_video.py", "--model_id", "M", "--resolution", "540P", "--prompt", "cat"]
    );
    assert_eq!(started[0].working_dir, Path::new("/opt/sky"));
    assert_eq!(
        observer.events(),
        vec![Observed::Line("step 1\n".to_string()), Observed::Exit(0)]
    );
    Ok(())
}

#[tokio::test]
async fn empty_interpreter_runs_program_directly() -> TestResult {
    let cfg = ConfigFileBuilder::new()
        .project_root("/srv")
        .interpreter("")
        .program("standard", "bin/gen")
        .build();
    let launcher = Launcher::with_backend(&cfg, FakeBackend::completing(&[], 0));

    let argv = launcher.command_for(&RequestBuilder::standard("M").build())?;
    assert_eq!(argv, ["/srv/bin/gen", "--model_id", "M"]);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn relative_project_root_runs_the_real_script() -> TestResult {
    init_tracing();

    let dir = tempfile::Builder::new().prefix("genlaunch-root").tempdir_in(".")?;
    std::fs::write(dir.path().join("gen.sh"), "echo \"gen $*\"\n")?;
    let relative = dir.path().file_name().ok_or("tempdir has no name")?;

    let cfg = ConfigFileBuilder::new()
        .project_root(relative)
        .interpreter("sh")
        .program("standard", "gen.sh")
        .build();
    let launcher = Launcher::from_config(&cfg);
    let observer = RecordingObserver::new();

    let handle = launcher.launch(&RequestBuilder::standard("M").build(), Box::new(observer.clone()))?;

    assert_eq!(with_timeout(handle.wait()).await, RunState::Completed(0));
    assert_eq!(observer.lines(), vec!["gen --model_id M\n"]);
    assert!(launcher.project_root().is_absolute());
    Ok(())
}

#[tokio::test]
async fn installer_uses_the_same_runner_contract() -> TestResult {
    let cfg = ConfigFileBuilder::new().project_root("/opt/sky").requirements("requirements.txt").build();
    let launcher = Launcher::with_backend(&cfg, FakeBackend::completing(&["Collecting torch\n"], 1));
    let observer = RecordingObserver::new();

    let handle = launcher.install_dependencies(Box::new(observer.clone()))?;

    assert_eq!(handle.wait().await, RunState::Completed(1));
    assert_eq!(
        launcher.backend().started()[0].argv,
        ["python", "-m", "pip", "install", "-r", "requirements.txt"]
    );
    assert_eq!(observer.exits(), vec![1]);
    Ok(())
}

#[tokio::test]
async fn session_refuses_a_second_run_while_one_is_active() -> TestResult {
    init_tracing();

    let cfg = ConfigFileBuilder::new().build();
    let mut session = LaunchSession::new(Launcher::with_backend(&cfg, FakeBackend::hanging()));
    let req = RequestBuilder::standard("M").build();

    let first = session.launch(&req, Box::new(RecordingObserver::new()))?;
    assert!(!session.can_launch());

    match session.launch(&req, Box::new(RecordingObserver::new())) {
        Err(LaunchError::RunInProgress) => {}
        other => panic!("expected RunInProgress, got {other:?}"),
    }
    assert!(matches!(
        session.install_dependencies(Box::new(RecordingObserver::new())),
        Err(LaunchError::RunInProgress)
    ));

    session.launcher().backend().finish_all(0);
    assert_eq!(first.wait().await, RunState::Completed(0));
    assert!(session.can_launch());

    let second = session.launch(&req, Box::new(RecordingObserver::new()))?;
    assert!(second.is_running());
    assert_eq!(session.launcher().backend().started().len(), 2);
    Ok(())
}

#[tokio::test]
async fn session_cancel_reaches_the_active_run() -> TestResult {
    let cfg = ConfigFileBuilder::new().build();
    let mut session = LaunchSession::new(Launcher::with_backend(&cfg, FakeBackend::hanging()));

    assert!(!session.cancel_active());
    session.launch(&RequestBuilder::standard("M").build(), Box::new(RecordingObserver::new()))?;
    assert!(session.cancel_active());
    assert!(!session.cancel_active());
    Ok(())
}

#[test]
fn cli_values_override_config_defaults() -> TestResult {
    let cfg = ConfigFileBuilder::new().default_resolution("720P").build();
    let args = CliArgs::try_parse_from([
        "genlaunch",
        "run",
        "--mode",
        "diffusion-forcing",
        "--num-frames",
        "257",
        "--prompt",
        "a fox",
        "--prompt-enhancer",
    ])?;
    let genlaunch::cli::Command::Run(run) = args.command else {
        panic!("expected run subcommand");
    };

    let req = request_from_args(&cfg, &run)?;
    assert_eq!(req.mode, GenerationMode::DiffusionForcing);
    assert_eq!(req.model_id, cfg.defaults.model_id);
    assert_eq!(req.common.resolution.as_deref(), Some("720P"));
    assert_eq!(req.common.num_frames.as_deref(), Some("257"));
    assert!(req.enhancer.is_some());
    Ok(())
}

#[test]
fn no_flag_switch_overrides_a_config_default() -> TestResult {
    let cfg = ConfigFileBuilder::new().default_offload(true).build();

    let parse = |argv: &[&str]| -> Result<genlaunch::cli::RunArgs, Box<dyn Error>> {
        match CliArgs::try_parse_from(argv)?.command {
            genlaunch::cli::Command::Run(run) => Ok(run),
            other => Err(format!("expected run subcommand, got {other:?}").into()),
        }
    };

    let inherited = request_from_args(&cfg, &parse(&["genlaunch", "run"])?)?;
    assert!(inherited.common.offload);

    let cleared = request_from_args(&cfg, &parse(&["genlaunch", "run", "--no-offload"])?)?;
    assert!(!cleared.common.offload);
    Ok(())
}

#[test]
fn unknown_cli_mode_is_rejected() -> TestResult {
    let cfg = ConfigFileBuilder::new().build();
    let args = CliArgs::try_parse_from(["genlaunch", "run", "--mode", "turbo"])?;
    let genlaunch::cli::Command::Run(run) = args.command else {
        panic!("expected run subcommand");
    };

    assert!(matches!(request_from_args(&cfg, &run), Err(LaunchError::UnknownMode(_))));
    Ok(())
}
