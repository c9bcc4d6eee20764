use {std::path::PathBuf, thiserror::Error};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cannot access config file {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("malformed config: {0}")]
    Parse(String),

    /// A section parsed but failed its own validation.
    #[error("invalid {section} config: {reason}")]
    Invalid {
        section: &'static str,
        reason: String,
    },

    /// A refresh must move the version strictly forward.
    #[error("config version {offered} is not newer than current version {current}")]
    VersionNotNewer { current: u64, offered: u64 },
}
