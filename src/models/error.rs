use crate::models::status::PackStatus;
use derive_more::Display;

#[derive(Debug, Display)]
pub enum PackError {
    #[display("format error: {_0}")]
    FormatError(String),
    #[display("not a modpack: {_0}")]
    NotAPack(String),
    #[display("missing resource: {_0}")]
    MissingResource(String),
    #[display("pack validation failed: {_0}")]
    Validation(PackStatus),
    #[display("unmet mod dependencies: {}", _0.join(", "))]
    Dependency(Vec<String>),
    #[display("io error: {_0}")]
    IOError(String),
    #[display("path escapes the data root: {_0}")]
    UnsafePath(String),
    #[display("target is locked by another operation: {_0}")]
    TargetLocked(String),
    #[display("no recovery unit found")]
    NoRecoveryUnit,
    #[display("background task failed: {_0}")]
    AsyncRuntimeError(String),
    #[display("unexpected error{}", _0.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Unexpected(Option<String>),
}

impl std::error::Error for PackError {}

impl PackError {
    /// Process exit code for each error category.
    pub fn exit_code(&self) -> i32 {
        match self {
            PackError::FormatError(_) | PackError::NotAPack(_) => 2,
            PackError::MissingResource(_) => 3,
            PackError::Validation(_) | PackError::UnsafePath(_) => 4,
            PackError::IOError(_) => 5,
            PackError::Dependency(_) => 6,
            PackError::TargetLocked(_) => 7,
            PackError::NoRecoveryUnit
            | PackError::AsyncRuntimeError(_)
            | PackError::Unexpected(_) => 1,
        }
    }
}

impl From<std::io::Error> for PackError {
    fn from(e: std::io::Error) -> Self {
        PackError::IOError(e.to_string())
    }
}

impl From<zip::result::ZipError> for PackError {
    fn from(e: zip::result::ZipError) -> Self {
        match e {
            zip::result::ZipError::Io(io) => PackError::IOError(io.to_string()),
            zip::result::ZipError::FileNotFound => {
                PackError::MissingResource("archive entry not found".into())
            }
            other => PackError::FormatError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for PackError {
    fn from(e: serde_json::Error) -> Self {
        PackError::FormatError(e.to_string())
    }
}

impl From<toml::de::Error> for PackError {
    fn from(e: toml::de::Error) -> Self {
        PackError::FormatError(e.to_string())
    }
}

impl From<toml::ser::Error> for PackError {
    fn from(e: toml::ser::Error) -> Self {
        PackError::FormatError(e.to_string())
    }
}

impl From<walkdir::Error> for PackError {
    fn from(e: walkdir::Error) -> Self {
        PackError::IOError(e.to_string())
    }
}

impl From<std::path::StripPrefixError> for PackError {
    fn from(e: std::path::StripPrefixError) -> Self {
        PackError::Unexpected(Some(e.to_string()))
    }
}

impl From<confy::ConfyError> for PackError {
    fn from(e: confy::ConfyError) -> Self {
        PackError::IOError(e.to_string())
    }
}
