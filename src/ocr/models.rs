//! The local cache of per-language model files.
//!
//! Model files are multi-megabyte blobs fetched once from the upstream
//! `tessdata_fast` release and then reused forever. Installation is
//! temp-file-then-rename, so a model file is never visible half-written at
//! its final name, even to a concurrent reader.

use std::{collections::BTreeMap, io::Write as _, time::Duration};

use futures::StreamExt as _;
use sha2::{Digest as _, Sha256};
use tokio_util::sync::CancellationToken;

use crate::{
    ocr::{OcrError, detect::MODEL_FILE_SUFFIX},
    prelude::*,
    ui::{ProgressConfig, Ui},
};

/// Where we download model files from. Pinned to a specific upstream tag so
/// that a cache populated today matches one populated next year.
pub const DEFAULT_MODEL_BASE_URL: &str =
    "https://raw.githubusercontent.com/tesseract-ocr/tessdata_fast/4.1.0";

/// How long we give a single model download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Known-good SHA-256 digests of upstream model files, keyed by language
/// code. Downloads for listed codes must match or they are rejected; codes
/// without an entry are accepted as-is. Nothing is vetted yet, so this
/// starts empty and entries get added as releases are checked.
const KNOWN_CHECKSUMS: &[(&str, &str)] = &[];

/// A directory of `<code>.traineddata` files, populated on demand.
pub struct ModelDataCache {
    data_dir: PathBuf,
    base_url: String,
    checksums: BTreeMap<String, String>,
    client: reqwest::Client,
}

impl ModelDataCache {
    /// Create a cache over `data_dir`, downloading from the default source.
    pub fn new(data_dir: PathBuf) -> ModelDataCache {
        Self::with_base_url(data_dir, DEFAULT_MODEL_BASE_URL.to_owned())
    }

    /// Create a cache downloading from a non-standard base URL.
    pub fn with_base_url(data_dir: PathBuf, base_url: String) -> ModelDataCache {
        ModelDataCache {
            data_dir,
            base_url,
            checksums: KNOWN_CHECKSUMS
                .iter()
                .map(|&(code, digest)| (code.to_owned(), digest.to_owned()))
                .collect(),
            client: reqwest::Client::new(),
        }
    }

    /// The directory this cache installs model files into.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Do we have a vetted digest for this language code?
    pub fn has_checksum(&self, code: &str) -> bool {
        self.checksums.contains_key(code)
    }

    /// Get the vetted digest for this language code, if any.
    pub fn get_checksum(&self, code: &str) -> Option<&str> {
        self.checksums.get(code).map(String::as_str)
    }

    #[cfg(test)]
    pub fn insert_checksum_for_tests(&mut self, code: &str, digest: &str) {
        self.checksums.insert(code.to_owned(), digest.to_owned());
    }

    /// Make sure model data for every language in `language_spec` is on
    /// disk, downloading whatever is missing.
    ///
    /// A failed download for any language fails the whole call; callers must
    /// not assume the earlier languages of a multi-language spec were
    /// installed when this returns an error.
    #[instrument(level = "debug", skip_all, fields(language_spec))]
    pub async fn ensure_model_data(
        &self,
        token: &CancellationToken,
        ui: &Ui,
        language_spec: &str,
    ) -> Result<()> {
        for code in split_language_spec(language_spec) {
            let model_path = self.model_path(&code);
            if model_path.exists() {
                trace!(code = %code, "Model data already present");
                continue;
            }
            self.download_model(token, ui, &code, &model_path).await?;
        }
        Ok(())
    }

    /// The install path for a language's model file.
    pub fn model_path(&self, code: &str) -> PathBuf {
        self.data_dir.join(format!("{}{}", code, MODEL_FILE_SUFFIX))
    }

    /// Download one language's model file and rename it into place.
    async fn download_model(
        &self,
        token: &CancellationToken,
        ui: &Ui,
        code: &str,
        model_path: &Path,
    ) -> Result<()> {
        let url = format!("{}/{}{}", self.base_url, code, MODEL_FILE_SUFFIX);
        info!(
            code = %code,
            url = %url,
            verified = self.has_checksum(code),
            "Downloading model data"
        );

        let download = self.stream_to_temp_file(token, ui, code, &url);
        let temp_file = tokio::time::timeout(DOWNLOAD_TIMEOUT, download)
            .await
            .map_err(|_| OcrError::ModelDataDownloadFailed {
                language: code.to_owned(),
                reason: format!("download timed out after {:?}", DOWNLOAD_TIMEOUT),
            })??;

        // Atomic install: the file appears at its final name all at once.
        temp_file.persist(model_path).with_context(|| {
            format!("failed to install model data at {:?}", model_path)
        })?;
        Ok(())
    }

    /// Stream the response body to a temp file next to the install location,
    /// verifying the digest when we know what it should be.
    async fn stream_to_temp_file(
        &self,
        token: &CancellationToken,
        ui: &Ui,
        code: &str,
        url: &str,
    ) -> Result<tempfile::NamedTempFile> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| OcrError::ModelDataDownloadFailed {
                language: code.to_owned(),
                reason: err.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(OcrError::ModelDataDownloadFailed {
                language: code.to_owned(),
                reason: format!("server returned {}", status),
            }
            .into());
        }

        let pb = ui.new_bytes_progress_bar(
            &ProgressConfig {
                emoji: "⬇️",
                msg: &format!("Fetching {}{}", code, MODEL_FILE_SUFFIX),
                done_msg: &format!("Fetched {}{}", code, MODEL_FILE_SUFFIX),
            },
            response.content_length(),
        );

        // The temp file must live in the data directory itself, so the final
        // rename stays on one filesystem.
        let mut temp_file = tempfile::Builder::new()
            .prefix(code)
            .suffix(".download")
            .tempfile_in(&self.data_dir)
            .with_context(|| {
                format!("cannot create temp file in {:?}", self.data_dir)
            })?;

        let mut hasher = Sha256::new();
        let mut stream = response.bytes_stream();
        loop {
            let chunk = tokio::select! {
                chunk = stream.next() => chunk,
                _ = token.cancelled() => return Err(OcrError::Cancelled.into()),
            };
            let Some(chunk) = chunk else { break };
            let chunk = chunk.map_err(|err| OcrError::ModelDataDownloadFailed {
                language: code.to_owned(),
                reason: err.to_string(),
            })?;
            hasher.update(&chunk);
            temp_file
                .write_all(&chunk)
                .context("cannot write model data to temp file")?;
            pb.inc(chunk.len() as u64);
        }
        temp_file
            .flush()
            .context("cannot flush model data temp file")?;
        pb.finish_using_style();

        if let Some(expected) = self.get_checksum(code) {
            let actual = format!("{:x}", hasher.finalize());
            // On failure the temp file is dropped, which deletes it.
            verify_checksum(code, expected, &actual)?;
        }
        Ok(temp_file)
    }
}

/// Check a downloaded file's digest against the vetted one for its language.
fn verify_checksum(code: &str, expected: &str, actual: &str) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(OcrError::ModelDataDownloadFailed {
            language: code.to_owned(),
            reason: format!("checksum mismatch: expected {}, got {}", expected, actual),
        }
        .into())
    }
}

/// Split a language spec like `"eng+fra"` or `"eng, deu"` into individual
/// codes, dropping empty tokens.
pub fn split_language_spec(spec: &str) -> Vec<String> {
    spec.split(['+', ','])
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_owned)
        .collect()
}
