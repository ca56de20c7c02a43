//! Detection of an installed native recognition binary.

use std::{env, ffi::OsStr, sync::LazyLock};

use regex::Regex;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::{exec::run_command, ocr::OcrError, prelude::*};

/// The binary we look for on `PATH`.
pub const NATIVE_ENGINE_PROGRAM: &str = "tesseract";

/// Environment variable overriding the native engine's model-data directory.
pub const TESSDATA_PREFIX_VAR: &str = "TESSDATA_PREFIX";

/// File suffix of language model files.
pub const MODEL_FILE_SUFFIX: &str = ".traineddata";

/// What we learned about an installed native engine.
#[derive(Clone, Debug)]
pub struct NativeEngineInfo {
    /// Absolute path to the binary.
    pub program: PathBuf,
    /// Version reported by the binary, e.g. `"5.3.4"`.
    pub version: String,
    /// The engine's model-data directory, if we could find one. `None` is
    /// not fatal; the backend falls back to our own cache directory.
    pub data_dir: Option<PathBuf>,
}

/// Matches a semantic version token like `5.3.4` or `4.1`.
static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+(?:\.\d+)?").expect("failed to compile regex"));

/// Look for an installed native recognition engine.
///
/// Fails with [`OcrError::EngineNotFound`] when the binary isn't on `PATH`.
/// A missing model-data directory does not fail detection.
#[instrument(level = "debug", skip_all)]
pub async fn detect_native_engine(
    token: &CancellationToken,
) -> Result<NativeEngineInfo> {
    let program = which::which(NATIVE_ENGINE_PROGRAM)
        .map_err(|_| OcrError::EngineNotFound(NATIVE_ENGINE_PROGRAM.to_owned()))?;

    // Ask the binary for its version. Old tesseract releases print the
    // version to stderr and may exit non-zero, so we parse whatever output
    // we got instead of checking the exit status.
    let mut cmd = Command::new(&program);
    cmd.arg("--version");
    let output = run_command(token, NATIVE_ENGINE_PROGRAM, cmd).await?;
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr),
    );
    let version = parse_version_output(&combined).ok_or_else(|| {
        anyhow!(
            "could not find a version in {} --version output:\n{}",
            NATIVE_ENGINE_PROGRAM,
            combined,
        )
    })?;

    let data_dir = find_model_data_dir(token, &program).await;
    debug!(
        program = %program.display(),
        version = %version,
        data_dir = ?data_dir,
        "Detected native engine"
    );
    Ok(NativeEngineInfo {
        program,
        version,
        data_dir,
    })
}

/// Pull a semantic version token out of the first line of version output.
fn parse_version_output(output: &str) -> Option<String> {
    let first_line = output.lines().find(|l| !l.trim().is_empty())?;
    VERSION_REGEX
        .find(first_line)
        .map(|m| m.as_str().to_owned())
}

/// Find the engine's model-data directory, trying in order: the environment
/// override, the engine's own parameter dump, and conventional install
/// locations.
async fn find_model_data_dir(
    token: &CancellationToken,
    program: &Path,
) -> Option<PathBuf> {
    if let Ok(dir) = env::var(TESSDATA_PREFIX_VAR) {
        let dir = PathBuf::from(dir);
        if is_valid_model_data_dir(&dir) {
            return Some(dir);
        }
        warn!(
            dir = %dir.display(),
            "{} is set but does not point at a model-data directory",
            TESSDATA_PREFIX_VAR,
        );
    }

    if let Some(dir) = data_dir_from_parameter_dump(token, program).await {
        return Some(dir);
    }

    conventional_data_dirs()
        .into_iter()
        .find(|dir| is_valid_model_data_dir(dir))
}

/// Ask the engine to dump its parameters and look for a data-directory field.
async fn data_dir_from_parameter_dump(
    token: &CancellationToken,
    program: &Path,
) -> Option<PathBuf> {
    let mut cmd = Command::new(program);
    cmd.arg("--print-parameters");
    let output = run_command(token, NATIVE_ENGINE_PROGRAM, cmd).await.ok()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        let mut fields = line.split_whitespace();
        let Some(key) = fields.next() else { continue };
        if matches!(key, "datadir" | "tessdata-dir" | "tessdata_prefix")
            && let Some(value) = fields.next()
        {
            let dir = PathBuf::from(value);
            if is_valid_model_data_dir(&dir) {
                return Some(dir);
            }
        }
    }
    None
}

/// Where distro packages usually install model data.
fn conventional_data_dirs() -> Vec<PathBuf> {
    [
        "/usr/share/tesseract-ocr/5/tessdata",
        "/usr/share/tesseract-ocr/4.00/tessdata",
        "/usr/share/tessdata",
        "/usr/local/share/tessdata",
        "/opt/homebrew/share/tessdata",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

/// A directory counts as model data only if it exists, is a directory, and
/// holds at least one model file.
pub fn is_valid_model_data_dir(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.flatten().any(|entry| {
            entry
                .path()
                .file_name()
                .and_then(OsStr::to_str)
                .is_some_and(|name| name.ends_with(MODEL_FILE_SUFFIX))
        }),
        Err(_) => false,
    }
}
