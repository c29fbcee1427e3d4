use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    /// TOML parse / deserialization error.
    Parse(String),
    /// Schema or settings validation error.
    Validation(String),
    /// Two attribute entries share a name.
    DuplicateAttrib(String),
    /// An attribute scope names an entity kind the engine does not support.
    UnknownKind { attrib: String, kind: String },
    /// IO error (file read/write).
    Io(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Validation(msg) => write!(f, "config validation error: {msg}"),
            Self::DuplicateAttrib(name) => write!(f, "duplicate attribute: {name}"),
            Self::UnknownKind { attrib, kind } => {
                write!(f, "attribute '{attrib}': unknown entity kind '{kind}'")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
