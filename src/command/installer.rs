// src/command/installer.rs

use std::path::Path;

/// `<interpreter> -m pip install -r <requirements>`, or plain `pip` when no
/// interpreter is configured.
pub fn installer_arguments(interpreter: Option<&str>, requirements: &Path) -> Vec<String> {
    let mut argv = match interpreter.map(str::trim).filter(|s| !s.is_empty()) {
        Some(python) => vec![python.to_string(), "-m".to_string(), "pip".to_string()],
        None => vec!["pip".to_string()],
    };
    argv.extend([
        "install".to_string(),
        "-r".to_string(),
        requirements.to_string_lossy().into_owned(),
    ]);
    argv
}
