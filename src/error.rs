//! Report errors

use std::fmt;
use std::path::{Path, PathBuf};

/// The kind of report error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// No `*.test*` result files in the target directory
    NoResultFiles,
    /// A result file exists but has no content
    EmptyResultFile,
    /// IO error (open, read, write)
    Io,
    /// XML serialization failed
    Xml,
}

/// A report error with optional file context
#[derive(Debug)]
pub struct ReportError {
    pub kind: ErrorKind,
    pub message: String,
    pub path: Option<PathBuf>,
}

impl ReportError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn no_result_files(dir: &Path) -> Self {
        Self::new(
            ErrorKind::NoResultFiles,
            format!("no *.testpass or *.testfail files found in '{}'", dir.display()),
        )
    }

    pub fn empty_result_file(path: &Path) -> Self {
        Self::new(ErrorKind::EmptyResultFile, "empty test result file").with_path(path)
    }

    pub fn io(path: &Path, err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, err.to_string()).with_path(path)
    }

    pub fn xml(msg: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Xml, format!("failed to write XML: {}", msg))
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: ", path.display())?;
        }
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ReportError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_path() {
        let err = ReportError::empty_result_file(Path::new("build/test_foo.testpass"));
        assert_eq!(err.kind, ErrorKind::EmptyResultFile);
        assert_eq!(err.to_string(), "build/test_foo.testpass: empty test result file");
    }

    #[test]
    fn test_display_without_path() {
        let err = ReportError::no_result_files(Path::new("out/"));
        assert_eq!(err.to_string(), "no *.testpass or *.testfail files found in 'out/'");
    }

    #[test]
    fn test_io_names_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ReportError::io(Path::new("out/result.xml"), io);
        assert_eq!(err.kind, ErrorKind::Io);
        assert_eq!(err.to_string(), "out/result.xml: gone");
    }
}
