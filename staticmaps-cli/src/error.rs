//! CLI error handling with user-friendly messages.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::process;

use staticmaps::config::ConfigFileError;
use staticmaps::parse::ParseError;
use staticmaps::RenderError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(std::io::Error),
    /// Configuration file could not be loaded or applied
    Config(ConfigFileError),
    /// `--type` or `--overlay` names no built-in provider
    UnknownProvider(String),
    /// A flag value is malformed
    InvalidArgument { flag: &'static str, source: ParseError },
    /// Rendering failed
    Render(RenderError),
    /// Failed to write the output file
    FileWrite {
        path: PathBuf,
        error: image::ImageError,
    },
}

impl CliError {
    /// Print the error with its causes and exit with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        let mut source = self.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }

        if let CliError::UnknownProvider(_) = self {
            eprintln!();
            eprintln!("Run 'create-static-map --type list' to see the available providers.");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(_) => write!(f, "Failed to initialize logging"),
            CliError::Config(_) => write!(f, "Configuration error"),
            CliError::UnknownProvider(name) => write!(f, "Unknown tile provider '{}'", name),
            CliError::InvalidArgument { flag, .. } => write!(f, "Invalid value for {}", flag),
            CliError::Render(_) => write!(f, "Failed to render map"),
            CliError::FileWrite { path, .. } => {
                write!(f, "Failed to write file '{}'", path.display())
            }
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::InvalidArgument { source, .. } => Some(source),
            CliError::Render(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::UnknownProvider(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<RenderError> for CliError {
    fn from(e: RenderError) -> Self {
        CliError::Render(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_and_source() {
        let err = CliError::InvalidArgument {
            flag: "--center",
            source: ParseError::InvalidCoordinates("x".to_string()),
        };
        assert_eq!(err.to_string(), "Invalid value for --center");
        assert!(err.source().unwrap().to_string().contains("'x'"));

        let err = CliError::from(RenderError::NoCenter);
        assert_eq!(err.to_string(), "Failed to render map");
        assert!(err.source().is_some());

        assert!(CliError::UnknownProvider("foo".to_string())
            .source()
            .is_none());
    }
}
