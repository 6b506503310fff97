//! Reads the reported metric back out of a run's output file.
//!
//! The metric is the third line of the file, trimmed. Every failure here is
//! soft: the run itself succeeded, only its report is lost.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::MultirunError;

/// Zero-based line holding the metric
pub const RESULT_LINE: usize = 2;

/// Outcome of reading one output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Trimmed metric line
    Found(String),
    /// No file at the output path
    Missing,
    /// File ended before the metric line
    TooShort { lines: usize },
    /// File exists but could not be read as text
    Unreadable(String),
}

impl Extraction {
    pub fn line(&self) -> Option<&str> {
        match self {
            Extraction::Found(line) => Some(line),
            _ => None,
        }
    }

    /// Console message for a soft failure, `None` when found
    pub fn failure_message(&self, path: &Path) -> Option<String> {
        match self {
            Extraction::Found(_) => None,
            Extraction::Missing => Some(format!("File {} not found.", path.display())),
            Extraction::TooShort { lines } => Some(format!(
                "File {} has only {} line(s); no result.",
                path.display(),
                lines
            )),
            Extraction::Unreadable(err) => Some(format!(
                "File {} could not be read: {}",
                path.display(),
                err
            )),
        }
    }

    /// Error form of a missing file, for logging
    pub fn as_error(&self, path: &Path) -> Option<MultirunError> {
        match self {
            Extraction::Missing => Some(MultirunError::ResultFileMissing(path.to_path_buf())),
            _ => None,
        }
    }
}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extraction::Found(line) => write!(f, "{}", line),
            Extraction::Missing => write!(f, "(missing)"),
            Extraction::TooShort { .. } => write!(f, "(short)"),
            Extraction::Unreadable(_) => write!(f, "(unreadable)"),
        }
    }
}

/// Read the metric line from `output_path`
pub fn extract(output_path: impl AsRef<Path>) -> Extraction {
    let path: PathBuf = output_path.as_ref().to_path_buf();
    let extraction = match fs::read_to_string(&path) {
        Ok(content) => metric_line(&content),
        Err(e) if e.kind() == ErrorKind::NotFound => Extraction::Missing,
        Err(e) => Extraction::Unreadable(e.to_string()),
    };
    debug!("Extraction from {}: {:?}", path.display(), extraction);
    extraction
}

fn metric_line(content: &str) -> Extraction {
    match content.lines().nth(RESULT_LINE) {
        Some(line) => Extraction::Found(line.trim().to_string()),
        None => Extraction::TooShort {
            lines: content.lines().count(),
        },
    }
}
