// tests/config_loading.rs

use std::error::Error;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use genlaunch::config::{ConfigFile, load_and_validate, load_or_default};
use genlaunch::errors::LaunchError;
use genlaunch::types::GenerationMode;
use genlaunch_test_utils::builders::ConfigFileBuilder;

type TestResult = Result<(), Box<dyn Error>>;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_config_is_parsed_and_programs_are_rooted() -> TestResult {
    let file = config_file(
        r#"
[launcher]
project_root = "/opt/skyreels"
interpreter = "python3"
requirements = "reqs/base.txt"

[programs]
standard = "generate_video.py"
diffusion-forcing = "scripts/df.py"

[defaults]
mode = "diffusion-forcing"
model_id = "Skywork/SkyReels-V2-DF-14B-720P"
resolution = "720P"
num_frames = 257
guidance_scale = 6.0
offload = true

[enhancer]
endpoint = "http://gpu-box:8000"
max_new_tokens = 512
"#,
    );

    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.launcher.interpreter(), Some("python3"));
    assert_eq!(cfg.launcher.requirements, Path::new("reqs/base.txt"));
    assert_eq!(
        cfg.programs.program_for(GenerationMode::DiffusionForcing)?,
        Path::new("/opt/skyreels/scripts/df.py")
    );
    assert_eq!(cfg.defaults.mode, GenerationMode::DiffusionForcing);
    assert_eq!(cfg.defaults.model_id, "Skywork/SkyReels-V2-DF-14B-720P");
    assert_eq!(cfg.defaults.options.resolution.as_deref(), Some("720P"));
    assert_eq!(cfg.defaults.options.num_frames.as_deref(), Some("257"));
    assert_eq!(cfg.defaults.options.guidance_scale.as_deref(), Some("6.0"));
    assert!(cfg.defaults.options.offload);
    assert_eq!(cfg.enhancer.endpoint, "http://gpu-box:8000");
    assert_eq!(cfg.enhancer.max_new_tokens, 512);
    Ok(())
}

#[test]
fn empty_file_uses_built_in_defaults() -> TestResult {
    let file = config_file("");
    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.launcher.interpreter(), Some("python"));
    assert_eq!(cfg.defaults.options.resolution.as_deref(), Some("540P"));
    assert_eq!(cfg.defaults.options.num_frames.as_deref(), Some("97"));
    assert_eq!(cfg.launcher.project_root, std::env::current_dir()?);
    assert_eq!(
        cfg.programs.program_for(GenerationMode::Standard)?,
        std::env::current_dir()?.join("generate_video.py")
    );
    assert_eq!(cfg.enhancer.max_new_tokens, 2048);
    Ok(())
}

#[test]
fn unknown_program_mode_returns_config_error() {
    let file = config_file(
        r#"
[programs]
turbo = "turbo.py"
"#,
    );

    match load_and_validate(file.path()) {
        Err(LaunchError::ConfigError(msg)) => {
            assert!(msg.contains("unknown mode"));
            assert!(msg.contains("turbo"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn zero_max_new_tokens_is_rejected() {
    let file = config_file("[enhancer]\nmax_new_tokens = 0\n");

    match load_and_validate(file.path()) {
        Err(LaunchError::ConfigError(msg)) => assert!(msg.contains("max_new_tokens")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn non_http_endpoint_is_rejected() {
    let file = config_file("[enhancer]\nendpoint = \"gpu-box:8000\"\n");
    assert!(matches!(load_and_validate(file.path()), Err(LaunchError::ConfigError(_))));
}

#[test]
fn invalid_toml_is_a_toml_error() {
    let file = config_file("[launcher\nproject_root = ");
    assert!(matches!(load_and_validate(file.path()), Err(LaunchError::TomlError(_))));
}

#[test]
fn relative_project_root_is_made_absolute() -> TestResult {
    let file = config_file("[launcher]\nproject_root = \"sky\"\n\n[programs]\nstandard = \"gen.py\"\n");
    let cfg = load_and_validate(file.path())?;

    let root = std::env::current_dir()?.join("sky");
    assert_eq!(cfg.launcher.project_root, root);
    assert_eq!(cfg.programs.program_for(GenerationMode::Standard)?, root.join("gen.py"));
    Ok(())
}

#[test]
fn explicit_missing_path_is_an_io_error() {
    let result = load_or_default(Some(Path::new("/no/such/dir/Genlaunch.toml")));
    assert!(matches!(result, Err(LaunchError::IoError(_))));
}

#[test]
fn only_configured_modes_are_known() -> TestResult {
    let cfg: ConfigFile = ConfigFileBuilder::new()
        .project_root("/srv")
        .program("standard", "gen.py")
        .build();

    assert_eq!(cfg.programs.program_for(GenerationMode::Standard)?, Path::new("/srv/gen.py"));
    assert!(matches!(
        cfg.programs.program_for(GenerationMode::DiffusionForcing),
        Err(LaunchError::UnknownMode(_))
    ));
    Ok(())
}
