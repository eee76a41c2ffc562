//! External braille transliteration
//!
//! Reconstructed text can be handed to the liblouis `lou_translate` tool to
//! produce contracted braille (BRF content) or a Unicode braille rendering.
//! The tool is an opaque text-to-text transform: this module only knows it
//! takes UTF-8 on stdin and a named translation table, and that any failure
//! is surfaced to the caller as a hard error with no retry.

use std::io::Write;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::debug;

/// Failure at the external transliteration boundary
#[derive(Debug, Error)]
pub enum TransliterateError {
    #[error("failed to run {command}: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("{command} produced non-UTF-8 output")]
    InvalidOutput {
        command: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Handle on the external transliteration tool
#[derive(Debug, Clone)]
pub struct Transliterator {
    command: String,
    table: String,
    display_table: String,
}

impl Default for Transliterator {
    fn default() -> Self {
        Self {
            command: "lou_translate".to_string(),
            table: "es-g1.ctb".to_string(),
            display_table: "unicode.dis".to_string(),
        }
    }
}

impl Transliterator {
    pub fn new(command: &str, table: &str, display_table: &str) -> Self {
        Self {
            command: command.to_string(),
            table: table.to_string(),
            display_table: display_table.to_string(),
        }
    }

    /// Forward-translate text into BRF file content
    pub fn to_brf(&self, text: &str) -> Result<String, TransliterateError> {
        self.run(&["--forward".to_string(), self.table.clone()], text)
    }

    /// Forward-translate text into Unicode braille via the display table
    pub fn to_ascii_braille(&self, text: &str) -> Result<String, TransliterateError> {
        let output = self.run(
            &[
                format!("--display-table={}", self.display_table),
                "--forward".to_string(),
                self.table.clone(),
            ],
            text,
        )?;
        Ok(output.trim().to_string())
    }

    fn run(&self, args: &[String], input: &str) -> Result<String, TransliterateError> {
        debug!("Running {} {:?}", self.command, args);

        let io_err = |source| TransliterateError::Io {
            command: self.command.clone(),
            source,
        };

        let mut child = Command::new(&self.command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(io_err)?;

        if let Some(mut stdin) = child.stdin.take() {
            // A child that exits before draining stdin reports through its
            // exit status below, not as a pipe error here.
            if let Err(err) = stdin.write_all(input.as_bytes()) {
                if err.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(io_err(err));
                }
            }
        }

        let output = child.wait_with_output().map_err(io_err)?;
        if !output.status.success() {
            return Err(TransliterateError::Failed {
                command: self.command.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|source| TransliterateError::InvalidOutput {
            command: self.command.clone(),
            source,
        })
    }
}
