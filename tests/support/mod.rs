#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Write an executable `sh` stand-in for ffmpeg into `dir`.
///
/// `-version` always succeeds; otherwise `$last` holds the output path when `body` runs.
#[cfg(unix)]
pub fn fake_ffmpeg(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt as _;

    let path = dir.join("fake-ffmpeg");
    let script = format!(
        "#!/bin/sh\nif [ \"$1\" = \"-version\" ]; then echo fake; exit 0; fi\nfor last; do :; done\n{body}\n"
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A small placeholder panorama; its bytes are never decoded by the crate.
pub fn write_panorama(dir: &Path, name: &str) -> PathBuf {
    let p = dir.join(name);
    std::fs::write(&p, b"panorama").unwrap();
    p
}

pub fn panosplit_exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_panosplit")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "panosplit.exe"
            } else {
                "panosplit"
            });
            p
        })
}
