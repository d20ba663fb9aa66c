// src/exec/runner.rs

//! Spawn a program and stream its merged output to a [`RunObserver`].

use std::io::{BufRead, BufReader, PipeReader};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::process::Stdio;

use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::{LaunchError, Result};
use crate::exec::handle::{HandleLink, ProcessHandle, RunState, handle_pair};
use crate::exec::observer::RunObserver;
use crate::exec::terminate::{exit_code_of, request_termination};

/// Start `argv[0]` with `argv[1..]` in `working_dir`.
///
/// Stdout and stderr share a single pipe, so the observer sees lines in the
/// order the child wrote them. The call returns as soon as the process is
/// spawned; output is delivered from a background task. Must be called from
/// within a Tokio runtime.
///
/// Spawn failures are returned here and never reach the observer.
pub fn start<O: RunObserver>(argv: &[String], working_dir: &Path, observer: O) -> Result<ProcessHandle> {
    let Some((program, args)) = argv.split_first() else {
        return Err(LaunchError::spawn(
            "",
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty argument vector"),
        ));
    };

    let (reader, writer) = std::io::pipe().map_err(|e| LaunchError::spawn(program, e))?;
    let writer_err = writer.try_clone().map_err(|e| LaunchError::spawn(program, e))?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::from(writer))
        .stderr(Stdio::from(writer_err))
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|e| LaunchError::spawn(program, e))?;
    // Our copies of the write end live in `cmd`; close them so EOF arrives
    // when the child exits.
    drop(cmd);

    let pid = child.id();
    info!(
        program = %program,
        pid = ?pid,
        cwd = %working_dir.display(),
        args = ?args,
        "started process"
    );

    let (handle, link) = handle_pair(pid);
    let (line_tx, line_rx) = mpsc::unbounded_channel::<String>();

    if let Err(e) = std::thread::Builder::new()
        .name("genlaunch-output".to_string())
        .spawn(move || pump_lines(reader, line_tx))
    {
        let _ = child.start_kill();
        return Err(LaunchError::spawn(program, e));
    }
    tokio::spawn(supervise(child, line_rx, link, observer, program.clone()));

    Ok(handle)
}

/// Blocking read loop; ends at EOF or when the supervisor goes away.
fn pump_lines(reader: PipeReader, tx: mpsc::UnboundedSender<String>) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf).into_owned();
                if tx.send(line).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!(error = %e, "reading process output failed");
                break;
            }
        }
    }
}

/// Owns the child until it exits: forwards lines, honours cancellation, and
/// reports the exit code exactly once. The handle always reaches a terminal
/// state, even if the observer panics.
async fn supervise<O: RunObserver>(
    mut child: Child,
    mut lines: mpsc::UnboundedReceiver<String>,
    mut link: HandleLink,
    mut observer: O,
    program: String,
) {
    let mut cancelled = false;
    let mut observer_alive = true;

    loop {
        tokio::select! {
            line = lines.recv() => match line {
                Some(line) => notify(&mut observer_alive, &program, || observer.on_line(&line)),
                None => break,
            },
            requested = link.cancel_requested(), if !cancelled => {
                if requested {
                    cancelled = true;
                    terminate(&mut child, &program);
                }
            }
        }
    }

    debug!(program = %program, "output stream closed; waiting for exit");

    let status = loop {
        tokio::select! {
            status = child.wait() => break status,
            requested = link.cancel_requested(), if !cancelled => {
                if requested {
                    cancelled = true;
                    terminate(&mut child, &program);
                }
            }
        }
    };

    // A cancel arriving from here on can no longer reach the child.
    link.stop_listening();

    let code = match status {
        Ok(status) => exit_code_of(status),
        Err(e) => {
            warn!(program = %program, error = %e, "waiting for process failed");
            -1
        }
    };

    info!(program = %program, exit_code = code, cancelled, "process exited");

    notify(&mut observer_alive, &program, || observer.on_exit(code));
    link.finish(if cancelled {
        RunState::Cancelled(code)
    } else {
        RunState::Completed(code)
    });
}

/// Run one observer callback. A panic is logged and silences the observer for
/// the rest of the run; the terminal state is still published.
fn notify(alive: &mut bool, program: &str, callback: impl FnOnce()) {
    if !*alive {
        return;
    }
    if panic::catch_unwind(AssertUnwindSafe(callback)).is_err() {
        *alive = false;
        warn!(program = %program, "observer panicked; dropping its remaining callbacks");
    }
}

fn terminate(child: &mut Child, program: &str) {
    info!(program = %program, pid = ?child.id(), "cancellation requested; terminating process");
    if let Err(e) = request_termination(child) {
        warn!(program = %program, error = %e, "failed to signal process on cancellation");
    }
}
