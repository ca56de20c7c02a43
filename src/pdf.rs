//! Bridge to the PDF tools that render page images for us.
//!
//! Everything here shells out to `poppler-utils`: `pdfinfo` for page counts
//! and `pdftocairo` for rasterization. OCR proper never touches the PDF; it
//! only ever sees the page images this module writes.

use std::collections::BTreeMap;

use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::{
    exec::{DEFAULT_ERROR_REGEX, check_for_command_failure, run_command},
    prelude::*,
};

/// Resolution to rasterize pages at. 300 DPI is the usual floor for OCR.
const RASTERIZE_DPI: u32 = 300;

/// Get the number of pages in a PDF file.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn page_count(
    token: &CancellationToken,
    path: &Path,
    password: Option<&str>,
) -> Result<usize> {
    let mut cmd = Command::new("pdfinfo");
    if let Some(password) = password {
        cmd.arg("-upw").arg(password);
    }
    cmd.arg(path);
    let output = run_command(token, "pdfinfo", cmd).await?;
    check_for_command_failure("pdfinfo", &output, None)?;

    // Parse the output of pdfinfo into properties.
    let output =
        String::from_utf8(output.stdout).context("pdfinfo output was not valid UTF-8")?;
    let mut properties = BTreeMap::new();
    for line in output.lines() {
        let mut parts = line.splitn(2, ':');
        let key = parts.next().unwrap_or("").trim();
        let value = parts.next().unwrap_or("").trim();
        properties.insert(key.to_string(), value.to_string());
    }

    let page_count_str = properties
        .get("Pages")
        .ok_or_else(|| anyhow!("failed to find page count in pdfinfo output"))?;
    page_count_str.parse::<usize>().with_context(|| {
        format!("failed to parse page count for {:?} from pdfinfo output", path)
    })
}

/// Rasterize the requested pages of a PDF into `out_dir`.
///
/// Pages are 1-based. Each page becomes `page-NNNN.png`, zero-padded so that
/// lexicographic filename order is page order, which is what the image
/// discovery pass sorts by.
#[instrument(level = "debug", skip_all, fields(path = %path.display(), pages = pages.len()))]
pub async fn extract_page_images(
    token: &CancellationToken,
    path: &Path,
    out_dir: &Path,
    pages: &[usize],
    password: Option<&str>,
) -> Result<()> {
    for &page in pages {
        let out_prefix = out_dir.join(format!("page-{:04}", page));
        let mut cmd = Command::new("pdftocairo");
        cmd.arg("-png")
            .arg("-singlefile")
            .arg("-r")
            .arg(RASTERIZE_DPI.to_string())
            .arg("-f")
            .arg(page.to_string())
            .arg("-l")
            .arg(page.to_string());
        if let Some(password) = password {
            cmd.arg("-upw").arg(password);
        }
        cmd.arg(path).arg(&out_prefix);
        let output = run_command(token, "pdftocairo", cmd).await?;
        check_for_command_failure("pdftocairo", &output, Some(&DEFAULT_ERROR_REGEX))
            .with_context(|| {
                format!("failed to rasterize page {} of {:?}", page, path)
            })?;
    }
    Ok(())
}
