use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unrecognized option: -{}", _0)]
    UnrecognizedOption(char),

    #[error("option -{} requires an argument", _0)]
    MissingOptionValue(char),

    #[error("long options are not supported: `{}`", _0)]
    UnsupportedLongOption(String),

    #[error(
        "\nNo default printer configured. Specify a -{} option, or set a default\nvia the PRINTER environment variable or the site configuration file.\n",
        .queue_flag
    )]
    NoDefaultQueue { queue_flag: char },

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("Error running `{}`: {}", .command, .original)]
    Subprocess {
        command: String,
        original: std::io::Error,
    },
}

impl Error {
    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    pub fn subprocess(command: String, original: std::io::Error) -> Self {
        Self::Subprocess { command, original }
    }

    /// The process exit code a wrapper should terminate with for this error.
    ///
    /// An unresolvable default queue is a configuration problem with its own
    /// documented exit code; everything else is a generic failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NoDefaultQueue { .. } => 2,
            _ => 1,
        }
    }
}
