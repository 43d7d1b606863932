use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::foundation::error::{PanoError, PanoResult};
use crate::plan::view::ViewSpec;
use crate::project::projector::{ProjectionDirective, Projector};

/// Per-call limit applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Options for [`FfmpegProjector`].
#[derive(Clone, Debug)]
pub struct FfmpegProjectorOpts {
    /// `ffmpeg` executable, usually resolved through [`locate_ffmpeg`].
    pub tool: PathBuf,
    /// Upper bound on a single projection call.
    pub timeout: Duration,
    /// Read the produced image header and require the requested dimensions.
    pub verify_dimensions: bool,
}

impl FfmpegProjectorOpts {
    /// Options for the given tool with the default timeout.
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            timeout: DEFAULT_TIMEOUT,
            verify_dimensions: false,
        }
    }

    /// Reject a zero timeout.
    pub fn validate(&self) -> PanoResult<()> {
        if self.timeout.is_zero() {
            return Err(PanoError::validation("projection timeout must be non-zero"));
        }
        Ok(())
    }
}

/// Projector backed by the `ffmpeg` `v360` filter, one process per view.
#[derive(Clone, Debug)]
pub struct FfmpegProjector {
    opts: FfmpegProjectorOpts,
}

impl FfmpegProjector {
    /// Create a projector; the tool itself is not probed here.
    pub fn new(opts: FfmpegProjectorOpts) -> PanoResult<Self> {
        opts.validate()?;
        Ok(Self { opts })
    }

    /// Options in use.
    pub fn opts(&self) -> &FfmpegProjectorOpts {
        &self.opts
    }

    /// Full command line for one view.
    pub fn command(&self, source: &Path, view: &ViewSpec, out_path: &Path) -> Command {
        let filter = ProjectionDirective::for_view(view).to_filter();
        let mut cmd = Command::new(&self.opts.tool);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.args(["-y", "-loglevel", "error", "-i"])
            .arg(source)
            .args(["-vf", filter.as_str(), "-q:v", &view.quality.to_string()])
            .arg(out_path);
        cmd
    }

    fn check_output(&self, view: &ViewSpec, out_path: &Path) -> PanoResult<()> {
        let produced = std::fs::metadata(out_path)
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false);
        if !produced {
            return Err(PanoError::projection(format!(
                "ffmpeg exited successfully but produced no output at '{}'",
                out_path.display()
            )));
        }

        if self.opts.verify_dimensions {
            let (w, h) = image::image_dimensions(out_path).map_err(|e| {
                PanoError::projection(format!(
                    "unreadable output '{}': {e}",
                    out_path.display()
                ))
            })?;
            if (w, h) != (view.width, view.height) {
                return Err(PanoError::projection(format!(
                    "output size mismatch: got {w}x{h}, expected {}x{}",
                    view.width, view.height
                )));
            }
        }
        Ok(())
    }
}

impl Projector for FfmpegProjector {
    fn project(&self, source: &Path, view: &ViewSpec, out_path: &Path) -> PanoResult<()> {
        // ffmpeg writes to a sibling; an earlier output is only replaced by a verified one.
        let staging = staging_path(out_path);
        remove_if_present(&staging)?;

        let mut cmd = self.command(source, view, &staging);
        tracing::debug!(index = view.output_index.0, cmd = ?cmd, "spawning ffmpeg");
        let result = run_with_timeout(&mut cmd, self.opts.timeout)
            .and_then(|()| self.check_output(view, &staging))
            .and_then(|()| {
                std::fs::rename(&staging, out_path).map_err(|e| {
                    PanoError::execution(format!(
                        "failed to move '{}' to '{}': {e}",
                        staging.display(),
                        out_path.display()
                    ))
                })
            });
        if result.is_err() {
            let _ = std::fs::remove_file(&staging);
        }
        result
    }
}

/// `<dir>/<stem>.tmp.<ext>` next to `out_path`; keeps the extension ffmpeg picks the muxer from.
pub fn staging_path(out_path: &Path) -> PathBuf {
    let stem = out_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match out_path.extension() {
        Some(ext) => format!("{stem}.tmp.{}", ext.to_string_lossy()),
        None => format!("{stem}.tmp"),
    };
    out_path.with_file_name(name)
}

fn remove_if_present(path: &Path) -> PanoResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PanoError::execution(format!(
            "failed to remove stale '{}': {e}",
            path.display()
        ))),
    }
}

/// Run `cmd` to completion, killing it once `timeout` elapses.
///
/// Stderr is drained on a helper thread so a chatty child cannot block on a full pipe; its
/// trimmed contents become the message of a non-zero exit.
pub fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> PanoResult<()> {
    cmd.stderr(Stdio::piped());
    let mut child = cmd
        .spawn()
        .map_err(|e| PanoError::execution(format!("failed to spawn ffmpeg: {e}")))?;

    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| PanoError::execution("failed to open ffmpeg stderr (unexpected)"))?;
    let stderr_drain = std::thread::spawn(move || {
        let mut stderr_bytes = Vec::new();
        stderr.read_to_end(&mut stderr_bytes)?;
        Ok::<_, std::io::Error>(stderr_bytes)
    });

    let deadline = Instant::now() + timeout;
    let status: ExitStatus = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                // Grandchildren may still hold the pipe; leave the drain thread detached.
                drop(stderr_drain);
                return Err(PanoError::ProjectionTimeout(timeout));
            }
            Ok(None) => std::thread::sleep(POLL_INTERVAL),
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(PanoError::execution(format!(
                    "failed to wait for ffmpeg: {e}"
                )));
            }
        }
    };

    let stderr_bytes = stderr_drain
        .join()
        .map_err(|_| PanoError::execution("ffmpeg stderr drain thread panicked"))?
        .map_err(|e| PanoError::execution(format!("ffmpeg stderr read failed: {e}")))?;

    if !status.success() {
        let stderr = String::from_utf8_lossy(&stderr_bytes);
        return Err(PanoError::projection(format!(
            "ffmpeg exited with status {}: {}",
            status,
            stderr.trim()
        )));
    }
    Ok(())
}

/// Return `true` when `tool -version` runs and exits successfully.
pub fn probe_tool(tool: &Path) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// `ffmpeg/bin/ffmpeg[.exe]` next to the running executable.
pub fn bundled_ffmpeg_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let mut p = exe.parent()?.join("ffmpeg").join("bin");
    p.push(if cfg!(windows) {
        "ffmpeg.exe"
    } else {
        "ffmpeg"
    });
    p.is_file().then_some(p)
}

/// Resolve the `ffmpeg` executable.
///
/// An explicit path must probe successfully. Without one, a bundled copy next to the
/// executable wins over `ffmpeg` on `PATH`.
pub fn locate_ffmpeg(explicit: Option<&Path>) -> PanoResult<PathBuf> {
    if let Some(tool) = explicit {
        if probe_tool(tool) {
            return Ok(tool.to_path_buf());
        }
        return Err(PanoError::tool_unavailable(format!(
            "'{}' could not be run as ffmpeg",
            tool.display()
        )));
    }

    if let Some(bundled) = bundled_ffmpeg_path()
        && probe_tool(&bundled)
    {
        return Ok(bundled);
    }

    let on_path = PathBuf::from("ffmpeg");
    if probe_tool(&on_path) {
        return Ok(on_path);
    }

    Err(PanoError::tool_unavailable(
        "ffmpeg not found; place it at ffmpeg/bin/ next to the executable or put it on PATH",
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/project/ffmpeg.rs"]
mod tests;
