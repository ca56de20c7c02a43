//! The recognition backend interface.

use std::fmt;

use async_trait::async_trait;
use clap::ValueEnum;
use tokio_util::sync::CancellationToken;

use crate::prelude::*;

/// Which backend the user asked for.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum BackendKind {
    /// Use the native engine if installed, otherwise fall back to the
    /// embedded one.
    #[default]
    Auto,
    /// Shell out to an installed `tesseract` binary for every image.
    Native,
    /// Drive an in-process libtesseract interpreter.
    Embedded,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Auto => write!(f, "auto"),
            BackendKind::Native => write!(f, "native"),
            BackendKind::Embedded => write!(f, "embedded"),
        }
    }
}

/// A recognition backend: something that can turn one page image into text.
///
/// Implementations differ in whether `process_image` may be called
/// concurrently. The native backend spawns an independent process per call
/// and is safe to fan out to; the embedded backend serializes calls through
/// one interpreter instance. [`crate::ocr::OcrEngine`] keys its dispatch
/// strategy on [`OcrBackend::name`], so names are part of the contract.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    /// A short stable identifier, e.g. `"native"` or `"embedded"`.
    fn name(&self) -> &'static str;

    /// Can this backend actually run on this machine?
    fn is_available(&self) -> bool;

    /// Recognize the text in one image file.
    async fn process_image(
        &self,
        token: &CancellationToken,
        image: &Path,
        lang: &str,
    ) -> Result<String>;

    /// Release any resources the backend holds.
    async fn close(&self) -> Result<()>;
}

/// Backend name used by the embedded implementation, and matched by the
/// engine's sequential-dispatch rule. Lives here so the rule and the
/// implementation cannot drift apart.
pub const EMBEDDED_BACKEND_NAME: &str = "embedded";

/// Backend name used by the native implementation.
pub const NATIVE_BACKEND_NAME: &str = "native";
