//! Parsing for `--pages` command-line arguments.

use crate::prelude::*;

/// Parse a page selection like `"1,3-5,12"` into a list of 1-based page
/// numbers, preserving the order the caller wrote them in.
///
/// An empty string means "all pages" and returns an empty list; downstream
/// code expands that to `1..=page_count`.
pub fn parse_page_list(spec: &str) -> Result<Vec<usize>> {
    let mut pages = vec![];
    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some((start, end)) = part.split_once('-') {
            let start = parse_page_number(start)?;
            let end = parse_page_number(end)?;
            if end < start {
                return Err(anyhow!("page range {:?} is backwards", part));
            }
            pages.extend(start..=end);
        } else {
            pages.push(parse_page_number(part)?);
        }
    }
    Ok(pages)
}

fn parse_page_number(s: &str) -> Result<usize> {
    let n = s
        .trim()
        .parse::<usize>()
        .with_context(|| format!("cannot parse page number {:?}", s))?;
    if n == 0 {
        return Err(anyhow!("page numbers start at 1"));
    }
    Ok(n)
}
