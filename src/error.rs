use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while reading a workspace and its projects.
///
/// Every variant names the file that caused it.  Any of these aborts the
/// whole workspace parse.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Not well-formed XML, or a required element/attribute is missing.
    #[error("{}: malformed document: {message}", path.display())]
    MalformedDocument { path: PathBuf, message: String },

    /// A project referenced by the workspace does not exist.
    #[error("{}: project file not found", path.display())]
    MissingProjectFile { path: PathBuf },

    /// A file exists but cannot be read.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The file this error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::MalformedDocument { path, .. }
            | Self::MissingProjectFile { path }
            | Self::Io { path, .. } => path,
        }
    }
}

/// Non-fatal findings reported alongside generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The configuration's `Type` is not one of the supported output kinds,
    /// so its link/archive rule was left out.
    UnsupportedOutputKind {
        project: String,
        configuration: String,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedOutputKind { project, configuration } => write!(
                f,
                "{project}/{configuration}: unsupported output type, link rule omitted"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_file() {
        let err = ParseError::malformed("a/b.project", "missing <Settings>");
        assert_eq!(err.to_string(), "a/b.project: malformed document: missing <Settings>");
        assert_eq!(err.path(), std::path::Path::new("a/b.project"));

        let err = ParseError::MissingProjectFile {
            path: "x.project".into(),
        };
        assert_eq!(err.to_string(), "x.project: project file not found");
    }

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::UnsupportedOutputKind {
            project: "App".into(),
            configuration: "Debug".into(),
        };
        assert_eq!(d.to_string(), "App/Debug: unsupported output type, link rule omitted");
    }
}
