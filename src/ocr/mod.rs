//! The OCR engine: backend selection, model data, and page dispatch.
//!
//! The one real design tension here is concurrency. The native backend is a
//! fresh OS process per image and fans out happily; the embedded backend is
//! a single mutating interpreter and must be fed one image at a time. The
//! engine owns that decision so no caller can get it wrong.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    ocr::{
        backend::{EMBEDDED_BACKEND_NAME, OcrBackend},
        detect::detect_native_engine,
        images::find_image_files,
        models::ModelDataCache,
        native::NativeBackend,
    },
    pdf,
    prelude::*,
    ui::{ProgressConfig, Ui},
};

pub mod backend;
pub mod detect;
#[cfg(feature = "embedded")]
pub mod embedded;
pub mod images;
pub mod models;
pub mod native;

pub use backend::BackendKind;

/// Failures callers need to tell apart. Everything else travels as plain
/// [`anyhow::Error`] context chains.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The requested native engine binary is not installed.
    #[error("recognition engine `{0}` not found on PATH")]
    EngineNotFound(String),

    /// Fetching a language's model data failed.
    #[error("failed to download model data for language {language}: {reason}")]
    ModelDataDownloadFailed { language: String, reason: String },

    /// The document produced no page images to recognize.
    #[error("no page images found to recognize")]
    NoImagesFound,

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,
}

/// Image batches larger than this fan out, when the backend allows it.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 5;

/// Don't bother drawing a recognition progress bar for fewer images.
const MIN_PROGRESS_IMAGES: u64 = 2;

/// Options for building an [`OcrEngine`].
#[derive(Clone, Debug, Default)]
pub struct EngineOptions {
    /// Language spec like `"eng"` or `"eng+fra"`. Defaults to `"eng"`.
    pub language: Option<String>,
    /// Which backend to use. Defaults to [`BackendKind::Auto`].
    pub backend: BackendKind,
    /// Where to keep downloaded model data. Defaults to
    /// `<user-data-dir>/docr/tessdata`.
    pub data_dir: Option<PathBuf>,
    /// Override for [`DEFAULT_PARALLEL_THRESHOLD`].
    pub parallel_threshold: Option<usize>,
}

/// An OCR engine bound to a language spec and (lazily) to a backend.
pub struct OcrEngine {
    language: String,
    requested: BackendKind,
    parallel_threshold: usize,
    cache: ModelDataCache,
    /// Selected on first use and reused for the engine's lifetime.
    backend: Option<Arc<dyn OcrBackend>>,
    /// Whether the active backend reads model data from our cache directory,
    /// meaning we're the ones responsible for populating it.
    needs_model_ensure: bool,
}

impl OcrEngine {
    /// Create an engine for a language spec, with default options.
    pub fn new(language: &str) -> Result<OcrEngine> {
        Self::with_options(EngineOptions {
            language: Some(language.to_owned()),
            ..EngineOptions::default()
        })
    }

    /// Create an engine from explicit options.
    ///
    /// Resolves and creates the model-data directory, but does not select a
    /// backend yet; detection runs on first use.
    pub fn with_options(options: EngineOptions) -> Result<OcrEngine> {
        let language = match options.language {
            Some(language) if !language.trim().is_empty() => language,
            _ => "eng".to_owned(),
        };
        let data_dir = match options.data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        std::fs::create_dir_all(&data_dir).with_context(|| {
            format!("cannot create model data directory {:?}", data_dir)
        })?;
        Ok(OcrEngine {
            language,
            requested: options.backend,
            parallel_threshold: options
                .parallel_threshold
                .unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
            cache: ModelDataCache::new(data_dir),
            backend: None,
            needs_model_ensure: false,
        })
    }

    /// The engine's language spec.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The name of the active backend, or `"none"` before one is bound.
    pub fn backend_name(&self) -> &str {
        self.backend.as_ref().map_or("none", |b| b.name())
    }

    /// Pick (or reuse) the backend for this engine.
    ///
    /// A specifically-requested backend that can't be built is a hard error.
    /// `Auto` tries the native engine first and falls back to the embedded
    /// one only when detection fails.
    pub async fn select_backend(
        &mut self,
        token: &CancellationToken,
    ) -> Result<Arc<dyn OcrBackend>> {
        if let Some(backend) = &self.backend {
            return Ok(backend.clone());
        }
        let backend: Arc<dyn OcrBackend> = match self.requested {
            BackendKind::Native => self.native_backend(token).await?,
            BackendKind::Embedded => self.embedded_backend()?,
            BackendKind::Auto => match self.native_backend(token).await {
                Ok(backend) => backend,
                Err(err) => {
                    info!(
                        "native engine unavailable ({:#}), using embedded backend",
                        err
                    );
                    self.embedded_backend().context(
                        "native engine unavailable and no embedded backend to fall back to",
                    )?
                }
            },
        };
        if !backend.is_available() {
            warn!(
                backend = backend.name(),
                "selected backend reports itself unavailable"
            );
        }
        debug!(backend = backend.name(), "Selected OCR backend");
        self.backend = Some(backend.clone());
        Ok(backend)
    }

    async fn native_backend(
        &mut self,
        token: &CancellationToken,
    ) -> Result<Arc<dyn OcrBackend>> {
        let info = detect_native_engine(token).await?;
        let backend = NativeBackend::new(info, self.cache.data_dir());
        self.needs_model_ensure = backend.uses_cache_dir();
        Ok(Arc::new(backend))
    }

    #[cfg(feature = "embedded")]
    fn embedded_backend(&mut self) -> Result<Arc<dyn OcrBackend>> {
        self.needs_model_ensure = true;
        Ok(Arc::new(embedded::EmbeddedBackend::new(
            self.cache.data_dir(),
        )))
    }

    #[cfg(not(feature = "embedded"))]
    fn embedded_backend(&mut self) -> Result<Arc<dyn OcrBackend>> {
        Err(anyhow!(
            "this build does not include the embedded backend \
             (rebuild with `--features embedded`)"
        ))
    }

    /// OCR a document: rasterize the requested pages (all pages when `pages`
    /// is empty) into a scratch directory, recognize them, and assemble the
    /// text in page order. The scratch directory is removed on return,
    /// success or failure.
    #[instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub async fn extract_text_from_document(
        &mut self,
        token: &CancellationToken,
        path: &Path,
        pages: &[usize],
        password: Option<&str>,
        ui: &Ui,
    ) -> Result<String> {
        if token.is_cancelled() {
            return Err(OcrError::Cancelled.into());
        }

        let pages: Vec<usize> = if pages.is_empty() {
            let count = pdf::page_count(token, path, password).await?;
            (1..=count).collect()
        } else {
            pages.to_vec()
        };

        let scratch = tempfile::TempDir::with_prefix("docr-pages")?;
        pdf::extract_page_images(token, path, scratch.path(), &pages, password).await?;

        let images = find_image_files(scratch.path())?;
        if images.is_empty() {
            return Err(OcrError::NoImagesFound.into());
        }
        debug!(images = images.len(), "Extracted page images");

        self.recognize_images(token, &images, ui).await
    }

    /// OCR every supported image file under a directory, in discovery order.
    #[instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
    pub async fn extract_text_from_directory(
        &mut self,
        token: &CancellationToken,
        dir: &Path,
        ui: &Ui,
    ) -> Result<String> {
        if token.is_cancelled() {
            return Err(OcrError::Cancelled.into());
        }
        let images = find_image_files(dir)?;
        if images.is_empty() {
            return Err(OcrError::NoImagesFound.into());
        }
        self.recognize_images(token, &images, ui).await
    }

    /// Select a backend, make sure its model data is present, and dispatch.
    async fn recognize_images(
        &mut self,
        token: &CancellationToken,
        images: &[PathBuf],
        ui: &Ui,
    ) -> Result<String> {
        self.select_backend(token).await?;
        if self.needs_model_ensure {
            self.cache
                .ensure_model_data(token, ui, &self.language)
                .await?;
        }
        self.process_images(token, images, ui).await
    }

    /// Recognize a batch of images and join the non-empty results with
    /// newlines, in input order.
    ///
    /// The dispatch strategy is decided once per call: the embedded backend
    /// is always driven sequentially, other backends fan out when the batch
    /// exceeds the parallel threshold. A failed image is logged and
    /// contributes no text; it never fails the batch.
    pub async fn process_images(
        &mut self,
        token: &CancellationToken,
        images: &[PathBuf],
        ui: &Ui,
    ) -> Result<String> {
        let backend = self.select_backend(token).await?;
        let pb = ui.new_progress_bar(
            &ProgressConfig {
                emoji: "🔍",
                msg: "Recognizing pages",
                done_msg: "Recognized pages",
            },
            images.len() as u64,
            MIN_PROGRESS_IMAGES,
        );

        let results = if should_parallelize(
            backend.name(),
            images.len(),
            self.parallel_threshold,
        ) {
            self.process_parallel(token, &backend, images, &pb).await?
        } else {
            self.process_sequential(token, &backend, images, &pb).await?
        };
        pb.finish_using_style();

        if token.is_cancelled() {
            return Err(OcrError::Cancelled.into());
        }
        Ok(results
            .into_iter()
            .flatten()
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// One image at a time, in input order.
    async fn process_sequential(
        &self,
        token: &CancellationToken,
        backend: &Arc<dyn OcrBackend>,
        images: &[PathBuf],
        pb: &indicatif::ProgressBar,
    ) -> Result<Vec<Option<String>>> {
        let mut results = Vec::with_capacity(images.len());
        for image in images {
            if token.is_cancelled() {
                return Err(OcrError::Cancelled.into());
            }
            let result = backend.process_image(token, image, &self.language).await;
            results.push(skip_failed_image(image, result));
            pb.inc(1);
        }
        Ok(results)
    }

    /// One task per image, reports collected over a channel sized to the
    /// exact batch, then reassembled in index order.
    ///
    /// A cancellation observed before a task launches sends an empty
    /// placeholder for its slot instead of spawning, so the collector always
    /// sees exactly `images.len()` reports and cannot deadlock.
    async fn process_parallel(
        &self,
        token: &CancellationToken,
        backend: &Arc<dyn OcrBackend>,
        images: &[PathBuf],
        pb: &indicatif::ProgressBar,
    ) -> Result<Vec<Option<String>>> {
        let (sender, mut receiver) = mpsc::channel::<(usize, Option<String>)>(images.len());
        for (idx, image) in images.iter().enumerate() {
            if token.is_cancelled() {
                // Placeholder: the channel holds a full batch, so this
                // cannot block.
                let _ = sender.try_send((idx, None));
                continue;
            }
            let sender = sender.clone();
            let backend = backend.clone();
            let token = token.clone();
            let image = image.clone();
            let language = self.language.clone();
            tokio::spawn(async move {
                let result = backend.process_image(&token, &image, &language).await;
                let _ = sender.send((idx, skip_failed_image(&image, result))).await;
            });
        }
        drop(sender);

        let mut results: Vec<Option<String>> = vec![None; images.len()];
        while let Some((idx, text)) = receiver.recv().await {
            results[idx] = text;
            pb.inc(1);
        }
        Ok(results)
    }

    /// Release the active backend, if any.
    pub async fn close(&mut self) -> Result<()> {
        match self.backend.take() {
            Some(backend) => backend.close().await,
            None => Ok(()),
        }
    }
}

/// The dispatch routing rule, split out for testing.
fn should_parallelize(backend_name: &str, image_count: usize, threshold: usize) -> bool {
    backend_name != EMBEDDED_BACKEND_NAME && image_count > threshold
}

/// Per-image failures are logged and skipped, never fatal to the batch; one
/// bad page shouldn't cost the caller the whole document.
fn skip_failed_image(image: &Path, result: Result<String>) -> Option<String> {
    match result {
        Ok(text) => Some(text),
        Err(err) => {
            warn!(image = %image.display(), "skipping image: {:#}", err);
            None
        }
    }
}

/// The default model-data location, `<user-data-dir>/docr/tessdata`.
pub fn default_data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .ok_or_else(|| anyhow!("cannot determine the user data directory"))?;
    Ok(base.join("docr").join("tessdata"))
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use async_trait::async_trait;

    use super::{backend::NATIVE_BACKEND_NAME, *};

    /// A backend that fabricates text from filenames and records how it was
    /// called.
    struct MockBackend {
        name: &'static str,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        /// Filename substring that makes a call fail.
        fail_on: Option<&'static str>,
        /// Filename substring that makes a call return empty text.
        empty_on: Option<&'static str>,
        /// Sleep a little, longer for earlier indices, to scramble
        /// completion order on the parallel path.
        scramble_completion: bool,
    }

    impl MockBackend {
        fn named(name: &'static str) -> MockBackend {
            MockBackend {
                name,
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                fail_on: None,
                empty_on: None,
                scramble_completion: false,
            }
        }
    }

    #[async_trait]
    impl OcrBackend for MockBackend {
        fn name(&self) -> &'static str {
            self.name
        }

        fn is_available(&self) -> bool {
            true
        }

        async fn process_image(
            &self,
            _token: &CancellationToken,
            image: &Path,
            _lang: &str,
        ) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            let stem = image.file_stem().unwrap().to_str().unwrap().to_owned();
            if self.scramble_completion {
                let index: u64 = stem
                    .rsplit('-')
                    .next()
                    .unwrap()
                    .parse()
                    .expect("test image names end in an index");
                tokio::time::sleep(Duration::from_millis(5 * (20 - index))).await;
            } else {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if let Some(substring) = self.fail_on
                && stem.contains(substring)
            {
                return Err(anyhow!("mock failure for {}", stem));
            }
            if let Some(substring) = self.empty_on
                && stem.contains(substring)
            {
                return Ok(String::new());
            }
            Ok(format!("text:{}", stem))
        }

        async fn close(&self) -> Result<()> {
            Ok(())
        }
    }

    fn engine_with(backend: Arc<dyn OcrBackend>, threshold: usize) -> OcrEngine {
        // The cache directory is never touched: `needs_model_ensure` is off.
        let dir = std::env::temp_dir().join("docr-engine-tests");
        OcrEngine {
            language: "eng".to_owned(),
            requested: BackendKind::Auto,
            parallel_threshold: threshold,
            cache: ModelDataCache::new(dir),
            backend: Some(backend),
            needs_model_ensure: false,
        }
    }

    fn image_paths(count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| PathBuf::from(format!("/scratch/page-{}.png", i)))
            .collect()
    }

    fn expected_text(count: usize) -> String {
        (0..count)
            .map(|i| format!("text:page-{}", i))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn routing_rule_boundaries() {
        // At or below the threshold: sequential.
        assert!(!should_parallelize(NATIVE_BACKEND_NAME, 5, 5));
        assert!(!should_parallelize(NATIVE_BACKEND_NAME, 1, 5));
        // Above it: parallel.
        assert!(should_parallelize(NATIVE_BACKEND_NAME, 6, 5));
        // The embedded backend never fans out, whatever the count.
        assert!(!should_parallelize(EMBEDDED_BACKEND_NAME, 100, 5));
    }

    #[tokio::test]
    async fn parallel_batch_preserves_input_order() {
        let backend = Arc::new(MockBackend {
            scramble_completion: true,
            ..MockBackend::named(NATIVE_BACKEND_NAME)
        });
        let mut engine = engine_with(backend.clone(), 5);
        let images = image_paths(7);
        let token = CancellationToken::new();
        let ui = Ui::init_for_tests();

        let text = engine.process_images(&token, &images, &ui).await.unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 7);
        assert_eq!(text, expected_text(7));
        // With the threshold exceeded, calls really did overlap.
        assert!(backend.max_in_flight.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn sequential_and_parallel_agree() {
        let images = image_paths(8);
        let token = CancellationToken::new();
        let ui = Ui::init_for_tests();

        let mut sequential =
            engine_with(Arc::new(MockBackend::named(NATIVE_BACKEND_NAME)), 100);
        let mut parallel =
            engine_with(Arc::new(MockBackend::named(NATIVE_BACKEND_NAME)), 2);

        let a = sequential.process_images(&token, &images, &ui).await.unwrap();
        let b = parallel.process_images(&token, &images, &ui).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a, expected_text(8));
    }

    #[tokio::test]
    async fn embedded_backend_is_never_called_concurrently() {
        let backend = Arc::new(MockBackend {
            scramble_completion: true,
            ..MockBackend::named(EMBEDDED_BACKEND_NAME)
        });
        // Threshold of 1 would fan out anything else.
        let mut engine = engine_with(backend.clone(), 1);
        let images = image_paths(10);
        let token = CancellationToken::new();
        let ui = Ui::init_for_tests();

        engine.process_images(&token, &images, &ui).await.unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 10);
        assert_eq!(backend.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_images_are_skipped_not_fatal() {
        let backend = Arc::new(MockBackend {
            fail_on: Some("page-2"),
            ..MockBackend::named(NATIVE_BACKEND_NAME)
        });
        let mut engine = engine_with(backend, 100);
        let images = image_paths(4);
        let token = CancellationToken::new();
        let ui = Ui::init_for_tests();

        let text = engine.process_images(&token, &images, &ui).await.unwrap();
        assert_eq!(text, "text:page-0\ntext:page-1\ntext:page-3");
    }

    #[tokio::test]
    async fn empty_results_contribute_nothing() {
        let backend = Arc::new(MockBackend {
            empty_on: Some("page-1"),
            ..MockBackend::named(NATIVE_BACKEND_NAME)
        });
        let mut engine = engine_with(backend, 1);
        let images = image_paths(3);
        let token = CancellationToken::new();
        let ui = Ui::init_for_tests();

        let text = engine.process_images(&token, &images, &ui).await.unwrap();
        assert_eq!(text, "text:page-0\ntext:page-2");
    }

    #[tokio::test]
    async fn cancelled_token_surfaces_promptly() {
        let mut engine =
            engine_with(Arc::new(MockBackend::named(NATIVE_BACKEND_NAME)), 2);
        let token = CancellationToken::new();
        token.cancel();
        let ui = Ui::init_for_tests();

        let err = engine
            .process_images(&token, &image_paths(10), &ui)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OcrError>(),
            Some(OcrError::Cancelled)
        ));

        // The document path too, without ever touching the (bogus) file.
        let err = engine
            .extract_text_from_document(
                &token,
                Path::new("/no/such/file.pdf"),
                &[],
                None,
                &ui,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OcrError>(),
            Some(OcrError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn backend_name_and_close_are_nil_safe() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = OcrEngine::with_options(EngineOptions {
            data_dir: Some(dir.path().to_owned()),
            ..EngineOptions::default()
        })
        .unwrap();
        assert_eq!(engine.backend_name(), "none");
        assert_eq!(engine.language(), "eng");
        engine.close().await.unwrap();

        let mut engine =
            engine_with(Arc::new(MockBackend::named(NATIVE_BACKEND_NAME)), 5);
        assert_eq!(engine.backend_name(), NATIVE_BACKEND_NAME);
        engine.close().await.unwrap();
        assert_eq!(engine.backend_name(), "none");
    }

    #[test]
    fn new_engine_uses_defaults() {
        let engine = OcrEngine::new("fra").unwrap();
        assert_eq!(engine.language(), "fra");
        assert_eq!(engine.backend_name(), "none");
        assert_eq!(engine.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
    }

    #[tokio::test]
    async fn model_data_is_ensured_only_for_cache_backed_backends() {
        let images_dir = tempfile::tempdir().unwrap();
        std::fs::write(images_dir.path().join("page-0001.png"), b"img").unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        let token = CancellationToken::new();
        let ui = Ui::init_for_tests();

        // A cache that fails loudly if anything tries to fetch into it.
        let unroutable_cache = || {
            ModelDataCache::with_base_url(
                cache_dir.path().to_owned(),
                "http://127.0.0.1:1".to_owned(),
            )
        };

        // Backend reading a system model directory: the cache is never
        // consulted, so the unroutable source doesn't matter.
        let mut engine =
            engine_with(Arc::new(MockBackend::named(NATIVE_BACKEND_NAME)), 5);
        engine.cache = unroutable_cache();
        let text = engine
            .extract_text_from_directory(&token, images_dir.path(), &ui)
            .await
            .unwrap();
        assert_eq!(text, "text:page-0001");

        // Backend reading our cache directory: missing model data must be
        // fetched first, and the failed fetch is fatal.
        let mut engine =
            engine_with(Arc::new(MockBackend::named(EMBEDDED_BACKEND_NAME)), 5);
        engine.cache = unroutable_cache();
        engine.needs_model_ensure = true;
        let err = engine
            .extract_text_from_directory(&token, images_dir.path(), &ui)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OcrError>(),
            Some(OcrError::ModelDataDownloadFailed { .. })
        ));

        // Model data already on disk satisfies the ensure without a fetch.
        std::fs::write(cache_dir.path().join("eng.traineddata"), b"model").unwrap();
        let mut engine =
            engine_with(Arc::new(MockBackend::named(EMBEDDED_BACKEND_NAME)), 5);
        engine.cache = unroutable_cache();
        engine.needs_model_ensure = true;
        let text = engine
            .extract_text_from_directory(&token, images_dir.path(), &ui)
            .await
            .unwrap();
        assert_eq!(text, "text:page-0001");
    }

    #[tokio::test]
    async fn single_image_directory_with_embedded_backend() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page-0001.png"), b"img").unwrap();

        let backend = Arc::new(MockBackend::named(EMBEDDED_BACKEND_NAME));
        let mut engine = engine_with(backend.clone(), 5);
        let token = CancellationToken::new();
        let ui = Ui::init_for_tests();

        let text = engine
            .extract_text_from_directory(&token, dir.path(), &ui)
            .await
            .unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(text, "text:page-0001");
    }

    #[tokio::test]
    async fn empty_image_directory_is_no_images_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine =
            engine_with(Arc::new(MockBackend::named(NATIVE_BACKEND_NAME)), 5);
        let token = CancellationToken::new();
        let ui = Ui::init_for_tests();

        let err = engine
            .extract_text_from_directory(&token, dir.path(), &ui)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OcrError>(),
            Some(OcrError::NoImagesFound)
        ));
    }
}
