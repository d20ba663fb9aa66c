// src/exec/observer.rs

//! Receivers for a run's output lines and exit status.

use std::io::Write;

/// Caller-supplied sink for one run.
///
/// `on_line` is called once per output line, in emission order, with the
/// line's trailing newline kept. `on_exit` is called exactly once, after the
/// last line.
pub trait RunObserver: Send + 'static {
    fn on_line(&mut self, line: &str);
    fn on_exit(&mut self, exit_code: i32);
}

impl<O: RunObserver + ?Sized> RunObserver for Box<O> {
    fn on_line(&mut self, line: &str) {
        (**self).on_line(line)
    }

    fn on_exit(&mut self, exit_code: i32) {
        (**self).on_exit(exit_code)
    }
}

/// Observer built from a pair of closures; see [`observer_fn`].
pub struct CallbackObserver<L, X> {
    on_line: L,
    on_exit: Option<X>,
}

/// Adapt two closures into a [`RunObserver`].
pub fn observer_fn<L, X>(on_line: L, on_exit: X) -> CallbackObserver<L, X>
where
    L: FnMut(&str) + Send + 'static,
    X: FnOnce(i32) + Send + 'static,
{
    CallbackObserver {
        on_line,
        on_exit: Some(on_exit),
    }
}

impl<L, X> RunObserver for CallbackObserver<L, X>
where
    L: FnMut(&str) + Send + 'static,
    X: FnOnce(i32) + Send + 'static,
{
    fn on_line(&mut self, line: &str) {
        (self.on_line)(line)
    }

    fn on_exit(&mut self, exit_code: i32) {
        if let Some(f) = self.on_exit.take() {
            f(exit_code)
        }
    }
}

/// Writes output verbatim to stdout, followed by a summary line.
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl RunObserver for ConsoleObserver {
    fn on_line(&mut self, line: &str) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(line.as_bytes());
        let _ = out.flush();
    }

    fn on_exit(&mut self, exit_code: i32) {
        // Ignore EPIPE: the reader may be gone (`genlaunch run | head`).
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "\nFinished with exit code {exit_code}");
        let _ = out.flush();
    }
}
