use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use genlaunch::errors::Result;
use genlaunch::exec::{HandleLink, ProcessBackend, ProcessHandle, RunObserver, RunState, handle_pair};

/// A `start` call seen by [`FakeBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedRun {
    pub argv: Vec<String>,
    pub working_dir: PathBuf,
}

enum Script {
    /// Emit the lines, then exit with the code straight away.
    Complete { lines: Vec<String>, exit_code: i32 },
    /// Stay running until cancelled.
    Hang,
}

/// A fake process backend that:
/// - records which argument vectors were "run" and where
/// - replays scripted output and an exit code without spawning anything.
pub struct FakeBackend {
    started: Arc<Mutex<Vec<StartedRun>>>,
    script: Script,
    links: Arc<Mutex<Vec<(HandleLink, Box<dyn RunObserver>)>>>,
}

impl FakeBackend {
    pub fn completing(lines: &[&str], exit_code: i32) -> Self {
        Self {
            started: Arc::new(Mutex::new(Vec::new())),
            script: Script::Complete {
                lines: lines.iter().map(|l| l.to_string()).collect(),
                exit_code,
            },
            links: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Runs never finish on their own; call [`FakeBackend::finish_all`].
    pub fn hanging() -> Self {
        Self {
            started: Arc::new(Mutex::new(Vec::new())),
            script: Script::Hang,
            links: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn started(&self) -> Vec<StartedRun> {
        self.started.lock().unwrap().clone()
    }

    /// Complete every hanging run with `exit_code`.
    pub fn finish_all(&self, exit_code: i32) {
        let pending: Vec<_> = self.links.lock().unwrap().drain(..).collect();
        for (link, mut observer) in pending {
            observer.on_exit(exit_code);
            link.finish(RunState::Completed(exit_code));
        }
    }
}

impl ProcessBackend for FakeBackend {
    fn start(
        &self,
        argv: Vec<String>,
        working_dir: &Path,
        mut observer: Box<dyn RunObserver>,
    ) -> Result<ProcessHandle> {
        self.started.lock().unwrap().push(StartedRun {
            argv,
            working_dir: working_dir.to_path_buf(),
        });

        let (handle, link) = handle_pair(None);
        match &self.script {
            Script::Complete { lines, exit_code } => {
                for line in lines {
                    observer.on_line(line);
                }
                observer.on_exit(*exit_code);
                link.finish(RunState::Completed(*exit_code));
            }
            Script::Hang => {
                self.links.lock().unwrap().push((link, observer));
            }
        }
        Ok(handle)
    }
}
