//! The `ocr` subcommand.

use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::{
    ocr::{BackendKind, EngineOptions, OcrEngine},
    pages::parse_page_list,
    prelude::*,
    ui::Ui,
};

/// Options for the `ocr` subcommand.
#[derive(Args, Debug)]
pub struct OcrOpts {
    /// A PDF to recognize, or a directory of image files.
    pub input_path: PathBuf,

    /// Pages to recognize, like "1,3-5". Defaults to all pages.
    #[clap(long, default_value = "")]
    pub pages: String,

    /// Password for an encrypted PDF.
    #[clap(long)]
    pub password: Option<String>,

    /// Language(s) to recognize, like "eng" or "eng+fra".
    #[clap(long, default_value = "eng")]
    pub lang: String,

    /// Which recognition backend to use. The embedded backend is only
    /// present in builds with `--features embedded`.
    #[clap(long, value_enum, default_value_t = BackendKind::Auto)]
    pub backend: BackendKind,

    /// Where to keep downloaded language model data.
    #[clap(long)]
    pub data_dir: Option<PathBuf>,

    /// Recognize more than this many pages concurrently (native backend
    /// only).
    #[clap(long)]
    pub parallel_threshold: Option<usize>,

    /// Write the recognized text here instead of to standard output.
    #[clap(long, short = 'o')]
    pub output_path: Option<PathBuf>,
}

/// The `ocr` subcommand.
#[instrument(level = "debug", skip_all)]
pub async fn cmd_ocr(ui: Ui, opts: &OcrOpts) -> Result<()> {
    let pages = parse_page_list(&opts.pages)?;
    let mut engine = OcrEngine::with_options(EngineOptions {
        language: Some(opts.lang.clone()),
        backend: opts.backend,
        data_dir: opts.data_dir.clone(),
        parallel_threshold: opts.parallel_threshold,
    })?;

    let token = cancel_on_ctrl_c();
    let result = if opts.input_path.is_dir() {
        engine
            .extract_text_from_directory(&token, &opts.input_path, &ui)
            .await
    } else {
        engine
            .extract_text_from_document(
                &token,
                &opts.input_path,
                &pages,
                opts.password.as_deref(),
                &ui,
            )
            .await
    };
    info!(
        backend = engine.backend_name(),
        lang = engine.language(),
        "Recognition finished"
    );

    // Close the backend before reporting any recognition error, but don't
    // let a close failure mask one.
    let close_result = engine.close().await;
    let text = result?;
    close_result?;

    match &opts.output_path {
        Some(path) => tokio::fs::write(path, &text)
            .await
            .with_context(|| format!("cannot write {:?}", path))?,
        None => println!("{}", text),
    }
    Ok(())
}

/// A token that cancels when the user hits Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    tokio::spawn({
        let token = token.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, shutting down");
                token.cancel();
            }
        }
    });
    token
}
