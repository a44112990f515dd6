//! External document conversion (`<tool> <input> -t html5`).

use log::{debug, warn};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::utils::config::{CONVERTER_TARGET_FORMAT, DEFAULT_CONVERTER};

/// Outcome of one conversion. A failure carries the diagnostics; it never aborts a walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Converted {
    Html(String),
    Failed {
        /// Exit code, or `None` if the process could not be started or was killed by a signal.
        code: Option<i32>,
        output: String,
    },
}

impl Converted {
    /// The HTML, or `fallback` on failure (after logging a warning naming `input`).
    pub fn or_fallback(self, input: &Path, fallback: &str) -> String {
        match self {
            Converted::Html(html) => html,
            Converted::Failed { code, output } => {
                let code = code.map_or_else(|| "no exit code".to_string(), |c| c.to_string());
                warn!(
                    "Error converting '{}' ({}):\n{}",
                    input.display(),
                    code,
                    output
                );
                fallback.to_string()
            }
        }
    }
}

/// Runs the converter program. Each call waits for the child to exit.
#[derive(Clone, Debug)]
pub struct DocumentConverter {
    program: String,
}

impl Default for DocumentConverter {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERTER)
    }
}

impl DocumentConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn convert(&self, input: &Path) -> Converted {
        debug!("{} {} -t {}", self.program, input.display(), CONVERTER_TARGET_FORMAT);
        let output = Command::new(&self.program)
            .arg(input)
            .args(["-t", CONVERTER_TARGET_FORMAT])
            .stdin(Stdio::null())
            .output();
        let output = match output {
            Ok(o) => o,
            Err(e) => {
                return Converted::Failed {
                    code: None,
                    output: format!("failed to run {}: {}", self.program, e),
                };
            }
        };
        let stdout = join_lines(&String::from_utf8_lossy(&output.stdout));
        if output.status.success() {
            Converted::Html(stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diagnostics = [stdout.as_str(), stderr.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            Converted::Failed {
                code: output.status.code(),
                output: diagnostics,
            }
        }
    }
}

/// Stdout lines joined with `\n`, surrounding whitespace trimmed.
fn join_lines(raw: &str) -> String {
    raw.lines().collect::<Vec<_>>().join("\n").trim().to_string()
}
