use std::sync::{Arc, Mutex};

use genlaunch::exec::RunObserver;

/// One callback received by a [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observed {
    Line(String),
    Exit(i32),
}

/// An observer that records every callback, in order, into shared storage.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<Observed>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything observed so far.
    pub fn events(&self) -> Vec<Observed> {
        self.events.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Observed::Line(l) => Some(l),
                Observed::Exit(_) => None,
            })
            .collect()
    }

    pub fn exits(&self) -> Vec<i32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Observed::Exit(code) => Some(code),
                Observed::Line(_) => None,
            })
            .collect()
    }
}

impl RunObserver for RecordingObserver {
    fn on_line(&mut self, line: &str) {
        self.events.lock().unwrap().push(Observed::Line(line.to_string()));
    }

    fn on_exit(&mut self, exit_code: i32) {
        self.events.lock().unwrap().push(Observed::Exit(exit_code));
    }
}
