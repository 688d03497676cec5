use crate::models::error::PackError;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Normalizes a destination subpath relative to a data root.
///
/// Both separators are accepted and `.` components are dropped. Absolute paths,
/// drive prefixes and `..` are rejected so the result always stays inside the root.
/// An empty string means the root itself.
pub fn sanitize_relative(raw: &str) -> Result<Utf8PathBuf, PackError> {
    let unified = raw.trim().replace('\\', "/");
    let mut out = Utf8PathBuf::new();

    for component in Utf8Path::new(&unified).components() {
        match component {
            Utf8Component::Normal(part) => out.push(part),
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir | Utf8Component::RootDir | Utf8Component::Prefix(_) => {
                return Err(PackError::UnsafePath(raw.to_string()));
            }
        }
    }

    Ok(out)
}

/// Whether `raw` is an acceptable destination subpath.
pub fn is_safe_relative(raw: &str) -> bool {
    sanitize_relative(raw).is_ok()
}

/// Path identity that survives `..`, symlinks and relative spelling, when the path exists.
pub fn same_path(a: &Utf8Path, b: &Utf8Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nested_and_empty() {
        assert_eq!(sanitize_relative("").unwrap(), Utf8PathBuf::new());
        assert_eq!(sanitize_relative("saves").unwrap(), Utf8PathBuf::from("saves"));
        assert_eq!(
            sanitize_relative("./schematics\\sub/").unwrap(),
            Utf8PathBuf::from("schematics/sub")
        );
    }

    #[test]
    fn rejects_escapes() {
        assert!(!is_safe_relative("../outside"));
        assert!(!is_safe_relative("saves/../../x"));
        assert!(!is_safe_relative("/etc"));
        assert!(!is_safe_relative("\\abs"));
    }
}
