//! Throwaway executables for subprocess tests.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// An executable shell script living in its own temporary directory.
///
/// The directory (and script) is removed when this value is dropped.
pub struct ScriptFile {
    _dir: TempDir,
    path: PathBuf,
}

impl ScriptFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write `body` to an executable `/bin/sh` script named `name`.
///
/// Panics on I/O failure; only meant for tests.
pub fn shell_script(name: &str, body: &str) -> ScriptFile {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("failed to create script");
    writeln!(file, "#!/bin/sh").expect("failed to write script");
    file.write_all(body.as_bytes()).expect("failed to write script");
    drop(file);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("failed to mark script executable");
    }

    ScriptFile { _dir: dir, path }
}
