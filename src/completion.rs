//! Text-completion collaborator. The core only needs `prompt -> text`; the
//! bundled implementation pipes the prompt into an external command.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("no completion command configured")]
    NotConfigured,
    #[error("failed to start completion command '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("completion command i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("completion command exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("completion service failed: {0}")]
    Service(String),
}

pub trait CompletionService: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

impl<F> CompletionService for F
where
    F: Fn(&str) -> Result<String, CompletionError> + Send + Sync,
{
    fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self(prompt)
    }
}

/// Stand-in used when no completion backend was configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

impl CompletionService for Unconfigured {
    fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        Err(CompletionError::NotConfigured)
    }
}

/// Runs a program with the prompt on stdin and takes its stdout as the
/// completion text.
#[derive(Debug, Clone)]
pub struct CommandCompleter {
    program: String,
    args: Vec<String>,
}

impl CommandCompleter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    /// Splits a command line on whitespace. Returns `None` when blank.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }
}

impl CompletionService for CommandCompleter {
    fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CompletionError::Spawn { program: self.program.clone(), source })?;

        // Feed stdin from a separate thread so a chatty child cannot
        // deadlock against a full stdout pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            let prompt = prompt.to_string();
            std::thread::spawn(move || stdin.write_all(prompt.as_bytes()))
        });
        let output = child.wait_with_output()?;
        if let Some(handle) = writer {
            match handle.join() {
                // the child may legitimately stop reading early
                Ok(Err(e)) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e.into()),
                Ok(_) => {}
                Err(_) => return Err(CompletionError::Service("stdin writer panicked".into())),
            }
        }

        if !output.status.success() {
            return Err(CompletionError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let text = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        debug!(program = %self.program, bytes = text.len(), "completion received");
        Ok(text)
    }
}
