use std::{fs::OpenOptions, io::Write, sync::Mutex};

use serde::Serialize;

use crate::trace::trace::{RunHeader, TraceEvent};

/// JSON-lines sink for synthesis traces.
///
/// A trace file holds one `RunHeader` per command run followed by that run's
/// `TraceEvent`s. Write failures go to stderr and never interrupt synthesis.
pub struct TraceLogger {
    sink: Option<Mutex<std::fs::File>>,
}

impl TraceLogger {
    /// Append to `path`, creating it if needed. An unopenable path yields a
    /// disabled logger.
    pub fn new(path: &str) -> Self {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => Self {
                sink: Some(Mutex::new(f)),
            },
            Err(e) => {
                eprintln!("Warning: trace disabled, cannot open '{}': {}", path, e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    /// `--trace <path>` if given, otherwise a disabled logger.
    pub fn from_option(path: Option<&str>) -> Self {
        path.map(Self::new).unwrap_or_else(Self::disabled)
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn begin_run(&self, header: &RunHeader) {
        self.write_line(header);
    }

    pub fn log(&self, event: &TraceEvent) {
        self.write_line(event);
    }

    fn write_line<T: Serialize>(&self, record: &T) {
        let Some(sink) = &self.sink else {
            return;
        };
        let line = match serde_json::to_string(record) {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Warning: trace record not serializable: {}", e);
                return;
            }
        };
        match sink.lock() {
            Ok(mut file) => {
                if let Err(e) = writeln!(file, "{}", line) {
                    eprintln!("Warning: trace write failed: {}", e);
                }
            }
            Err(e) => eprintln!("Warning: trace sink poisoned: {}", e),
        }
    }
}
