//! Video compression through the `ffmpeg` CLI.

use std::ffi::OsString;
use std::path::Path;

use tokio::process::Command;
use tracing::{debug, warn};

/// Trailing stderr kept in [`CompressionError::Failed`].
const STDERR_TAIL_CHARS: usize = 2000;

#[derive(Debug, thiserror::Error)]
pub enum CompressionError {
    #[error("failed to start {bin}: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("compressor exited with {status:?}: {stderr}")]
    Failed { status: Option<i32>, stderr: String },
}

/// Re-encodes a video file into a smaller one.
#[async_trait::async_trait]
pub trait Compressor: Send + Sync {
    /// Compress `input` into `output`.
    ///
    /// # Errors
    ///
    /// Returns a [`CompressionError`] if the encoder cannot run or fails.
    async fn compress(&self, input: &Path, output: &Path) -> Result<(), CompressionError>;
}

/// H.264/AAC re-encode tuned for fast start and small size.
pub struct FfmpegCompressor {
    bin: String,
}

impl FfmpegCompressor {
    #[must_use]
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    pub(crate) fn args(input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), input.into()];
        args.extend(
            ["-vcodec", "libx264", "-preset", "fast", "-crf", "28", "-acodec", "aac", "-movflags", "faststart"]
                .into_iter()
                .map(OsString::from),
        );
        args.push(output.into());
        args
    }
}

#[async_trait::async_trait]
impl Compressor for FfmpegCompressor {
    async fn compress(&self, input: &Path, output: &Path) -> Result<(), CompressionError> {
        debug!(bin = %self.bin, input = %input.display(), output = %output.display(), "compression: starting");
        let out = Command::new(&self.bin)
            .args(Self::args(input, output))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| CompressionError::Spawn { bin: self.bin.clone(), source })?;

        if out.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&out.stderr);
        let tail = stderr_tail(&stderr);
        warn!(status = ?out.status.code(), "compression: encoder failed");
        Err(CompressionError::Failed { status: out.status.code(), stderr: tail })
    }
}

fn stderr_tail(stderr: &str) -> String {
    let total = stderr.chars().count();
    stderr.chars().skip(total.saturating_sub(STDERR_TAIL_CHARS)).collect()
}

#[cfg(test)]
#[path = "compression_test.rs"]
mod tests;
