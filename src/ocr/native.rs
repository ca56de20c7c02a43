//! Backend that shells out to an installed recognition binary.

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::{
    exec::{check_for_command_failure, run_command},
    ocr::{
        backend::{NATIVE_BACKEND_NAME, OcrBackend},
        detect::NativeEngineInfo,
    },
    prelude::*,
};

/// Backend wrapping the detected `tesseract` binary.
///
/// Every `process_image` call is an independent OS process working in its
/// own scratch directory, so calls may safely run concurrently, bounded only
/// by what the OS will give us.
pub struct NativeBackend {
    info: NativeEngineInfo,
    /// Passed as `--tessdata-dir`. Detection's data dir when it found one,
    /// otherwise our own cache directory.
    data_dir: PathBuf,
}

impl NativeBackend {
    /// Create a backend from a detection result. `cache_dir` is used for
    /// model data when detection didn't find the engine's own directory.
    pub fn new(info: NativeEngineInfo, cache_dir: &Path) -> NativeBackend {
        let data_dir = info
            .data_dir
            .clone()
            .unwrap_or_else(|| cache_dir.to_owned());
        NativeBackend { info, data_dir }
    }

    /// Does this backend read model data from our cache directory (as
    /// opposed to a system install we shouldn't write to)?
    pub fn uses_cache_dir(&self) -> bool {
        self.info.data_dir.is_none()
    }

    /// Build the recognition command for one image.
    fn recognition_command(&self, image: &Path, output_base: &Path, lang: &str) -> Command {
        let mut cmd = Command::new(&self.info.program);
        cmd.arg(image)
            .arg(output_base)
            .arg("-l")
            .arg(lang)
            .arg("--tessdata-dir")
            .arg(&self.data_dir);
        cmd
    }
}

#[async_trait]
impl OcrBackend for NativeBackend {
    fn name(&self) -> &'static str {
        NATIVE_BACKEND_NAME
    }

    fn is_available(&self) -> bool {
        self.info.program.is_file()
    }

    #[instrument(level = "debug", skip_all, fields(image = %image.display()))]
    async fn process_image(
        &self,
        token: &CancellationToken,
        image: &Path,
        lang: &str,
    ) -> Result<String> {
        // Scratch space for the binary's output file; removed on return,
        // success or failure, when the TempDir drops.
        let tmpdir = tempfile::TempDir::with_prefix("docr-native")?;
        let output_base = tmpdir.path().join("output");

        let cmd = self.recognition_command(image, &output_base, lang);
        let output = run_command(token, "tesseract", cmd).await?;
        check_for_command_failure("tesseract", &output, None)?;

        let text_path = output_base.with_extension("txt");
        let text = std::fs::read_to_string(&text_path)
            .with_context(|| format!("cannot read {:?}", text_path))?;
        Ok(text.trim().to_owned())
    }

    async fn close(&self) -> Result<()> {
        // No persistent resources.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_info(data_dir: Option<PathBuf>) -> NativeEngineInfo {
        NativeEngineInfo {
            program: PathBuf::from("/usr/bin/tesseract"),
            version: "5.3.4".to_owned(),
            data_dir,
        }
    }

    #[test]
    fn detected_data_dir_wins_over_cache_dir() {
        let cache = Path::new("/cache/tessdata");
        let system = PathBuf::from("/usr/share/tessdata");

        let backend = NativeBackend::new(fake_info(Some(system.clone())), cache);
        assert!(!backend.uses_cache_dir());
        assert_eq!(backend.data_dir, system);

        let backend = NativeBackend::new(fake_info(None), cache);
        assert!(backend.uses_cache_dir());
        assert_eq!(backend.data_dir, cache);
    }

    #[test]
    fn recognition_command_has_expected_flags() {
        let backend = NativeBackend::new(fake_info(None), Path::new("/cache/tessdata"));
        let cmd = backend.recognition_command(
            Path::new("/tmp/page-0001.png"),
            Path::new("/tmp/output"),
            "eng+fra",
        );
        let args: Vec<_> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "/tmp/page-0001.png",
                "/tmp/output",
                "-l",
                "eng+fra",
                "--tessdata-dir",
                "/cache/tessdata",
            ],
        );
    }
}
