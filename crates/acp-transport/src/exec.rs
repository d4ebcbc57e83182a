//! Resolving an agent executable name to a runnable path (spec §4.1).
//!
//! Resolution mirrors what a shell does for a bare command name: search
//! `PATH` for relative names with no separator, otherwise treat the name as
//! a path and check it directly. No shebang or file-magic inspection is
//! done; the OS loader decides whether a resolved path is actually runnable.

use crate::error::TransportError;
use std::path::{Path, PathBuf};

/// Resolve `name` to an executable file.
///
/// - A name containing a path separator (`./agent`, `/usr/bin/agent`,
///   `../bin/agent`) is checked directly, relative to the current directory.
/// - A bare name (`agent`) is searched for across `PATH`, in order.
pub fn resolve_executable(name: &str) -> Result<PathBuf, TransportError> {
    let path = Path::new(name);
    if path.components().count() > 1 {
        return check_executable(path);
    }

    let path_var = std::env::var_os("PATH").unwrap_or_default();
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(name);
        if check_executable(&candidate).is_ok() {
            return Ok(candidate);
        }
    }
    Err(TransportError::ExecutableNotFound(name.to_string()))
}

fn check_executable(path: &Path) -> Result<PathBuf, TransportError> {
    let metadata = std::fs::metadata(path)
        .map_err(|_| TransportError::ExecutableNotFound(path.display().to_string()))?;

    if !metadata.is_file() {
        return Err(TransportError::ExecutableNotFound(path.display().to_string()));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(TransportError::NotExecutable(path.display().to_string()));
        }
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    #[cfg(unix)]
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn finds_executable_on_path() {
        let resolved = resolve_executable("sh");
        assert!(resolved.is_ok(), "expected to find `sh` on PATH: {resolved:?}");
    }

    #[test]
    fn rejects_unknown_bare_name() {
        let result = resolve_executable("definitely-not-a-real-command-xyz");
        assert!(matches!(result, Err(TransportError::ExecutableNotFound(_))));
    }

    #[test]
    fn checks_explicit_relative_path_directly() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("agent.sh");
        {
            let mut file = std::fs::File::create(&script).unwrap();
            writeln!(file, "#!/bin/sh\necho hi").unwrap();
        }
        #[cfg(unix)]
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let resolved = resolve_executable(script.to_str().unwrap());
        assert_eq!(resolved.unwrap(), script);
    }

    #[cfg(unix)]
    #[test]
    fn rejects_non_executable_file() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("not-executable");
        std::fs::write(&file_path, "hello").unwrap();
        std::fs::set_permissions(&file_path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let result = resolve_executable(file_path.to_str().unwrap());
        assert!(matches!(result, Err(TransportError::NotExecutable(_))));
    }
}
