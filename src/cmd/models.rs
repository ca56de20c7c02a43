//! The `models` subcommand.

use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::{
    ocr::{default_data_dir, models::ModelDataCache},
    prelude::*,
    ui::Ui,
};

/// Options for the `models` subcommand.
#[derive(Args, Debug)]
pub struct ModelsOpts {
    /// Language(s) to fetch model data for, like "eng" or "eng+fra".
    #[clap(long, default_value = "eng")]
    pub lang: String,

    /// Where to keep downloaded language model data.
    #[clap(long)]
    pub data_dir: Option<PathBuf>,
}

/// The `models` subcommand: pre-fetch language model data so later `ocr`
/// runs don't pause to download it.
#[instrument(level = "debug", skip_all)]
pub async fn cmd_models(ui: Ui, opts: &ModelsOpts) -> Result<()> {
    let data_dir = match &opts.data_dir {
        Some(dir) => dir.clone(),
        None => default_data_dir()?,
    };
    std::fs::create_dir_all(&data_dir).with_context(|| {
        format!("cannot create model data directory {:?}", data_dir)
    })?;

    let cache = ModelDataCache::new(data_dir);
    let token = CancellationToken::new();
    cache.ensure_model_data(&token, &ui, &opts.lang).await?;
    info!(lang = %opts.lang, dir = %cache.data_dir().display(), "Model data ready");
    Ok(())
}
