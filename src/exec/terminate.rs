// src/exec/terminate.rs

//! Non-forceful termination and exit-code mapping.

use std::io;
use std::process::ExitStatus;

use tokio::process::Child;

/// Ask the child to stop: SIGTERM on Unix, the runtime's kill elsewhere.
#[cfg(unix)]
pub(crate) fn request_termination(child: &mut Child) -> io::Result<()> {
    let Some(pid) = child.id() else {
        // Already reaped.
        return Ok(());
    };
    let pid = libc::pid_t::try_from(pid).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // SAFETY: kill(2) has no memory-safety preconditions; `pid` belongs to a
    // child we have not yet reaped, so it cannot have been recycled.
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
pub(crate) fn request_termination(child: &mut Child) -> io::Result<()> {
    child.start_kill()
}

/// Exit code as reported to observers; `-signal` when killed by a signal.
pub(crate) fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}
