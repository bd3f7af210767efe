//! Error types for the build orchestrator.

use std::{io, path::PathBuf, result};

/// Errors that abort the build pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("source repository {url} is unavailable: {reason}")]
    SourceUnavailable { url: String, reason: String },

    #[error("checkout {} has local modifications:\n{}", .path.display(), .changes.join("\n"))]
    DirtyCheckout { path: PathBuf, changes: Vec<String> },

    #[error("invalid build configuration: {0}")]
    Configuration(String),

    #[error("`{command}` {}\n{output}", exit_description(.code))]
    BuildToolFailure {
        command: String,
        code: Option<i32>,
        output: String,
    },

    #[error("expected artifacts missing: {}", .path.display())]
    ArtifactMissing { path: PathBuf },

    #[error("failed to {action} {}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write archive {}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("{context}")]
    Font {
        context: String,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { action, path: path.into(), source }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn font(context: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Font { context: context.into(), source: source.into() }
    }

    /// Process exit code for this failure, one per phase.
    ///
    /// A failing tool's own exit code stays in the error message.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::SourceUnavailable { .. } | Error::DirtyCheckout { .. } => 2,
            Error::Configuration(_) => 3,
            Error::BuildToolFailure { .. } => 4,
            Error::ArtifactMissing { .. } => 5,
            Error::Io { .. } | Error::Archive { .. } | Error::Font { .. } => 1,
        }
    }
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {code}"),
        None => "did not run to completion".to_string(),
    }
}

pub type Result<T> = result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_per_phase() {
        let source = Error::SourceUnavailable { url: "u".into(), reason: "r".into() };
        assert_eq!(source.exit_code(), 2);
        assert_eq!(Error::config("bad").exit_code(), 3);
        assert_eq!(Error::ArtifactMissing { path: "dist".into() }.exit_code(), 5);
    }

    #[test]
    fn test_tool_failure_has_its_own_exit_code() {
        let failure =
            |code| Error::BuildToolFailure { command: "npm".into(), code, output: String::new() };
        for code in [Some(1), Some(2), Some(3), Some(5), Some(300), None] {
            assert_eq!(failure(code).exit_code(), 4);
        }
    }

    #[test]
    fn test_tool_failure_message() {
        let err = Error::BuildToolFailure {
            command: "npm run build".into(),
            code: Some(1),
            output: "error: boom".into(),
        };
        assert_eq!(err.to_string(), "`npm run build` exited with status 1\nerror: boom");
    }
}
