//! The `detect` subcommand.

use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::{ocr::detect::detect_native_engine, prelude::*};

/// Options for the `detect` subcommand.
#[derive(Args, Debug)]
pub struct DetectOpts {}

/// The `detect` subcommand: report what we know about the installed native
/// recognition engine.
#[instrument(level = "debug", skip_all)]
pub async fn cmd_detect(_opts: &DetectOpts) -> Result<()> {
    let token = CancellationToken::new();
    let info = detect_native_engine(&token).await?;
    println!("program: {}", info.program.display());
    println!("version: {}", info.version);
    match &info.data_dir {
        Some(dir) => println!("model data: {}", dir.display()),
        None => println!("model data: (not found, will use the local cache)"),
    }
    Ok(())
}
