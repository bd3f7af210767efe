//! WOFF2 conversion with automatic problematic glyph handling.
//!
//! Fonts are first subset through [`Subsetter`] (to drop codepoints that
//! break browser validation, or to cut a script subset), then compressed
//! with `ttf2woff2`.
//!
//! # Example
//!
//! ```no_run
//! use iosevka_font_woff2::{available_codepoints, convert_to_woff2};
//!
//! let ttf_data: &[u8] = &[];
//! let codepoints = available_codepoints(ttf_data).unwrap();
//! let woff2 = convert_to_woff2(ttf_data, &codepoints).unwrap();
//! ```

use std::collections::BTreeSet;

use anyhow::{Context, Result, anyhow, bail};
use iosevka_font_subsetter::Subsetter;
use read_fonts::{FontRef, TableProvider};
use ttf2woff2::{BrotliQuality, encode};

/// Codepoints known to cause WOFF2 OTS validation errors.
///
/// U+F8FF (Apple logo) references `.notdef` as a composite component,
/// which Chrome's OTS parser rejects during WOFF2 decompression.
pub const PROBLEMATIC_CODEPOINTS: &[u32] = &[0xF8FF];

/// Returns every codepoint mapped to a real glyph by any cmap subtable.
pub fn available_codepoints(data: &[u8]) -> Result<BTreeSet<u32>> {
    let font = FontRef::new(data).context("Failed to parse font")?;
    let cmap = font.cmap().context("Failed to read cmap table")?;

    let mut codepoints = BTreeSet::new();
    for record in cmap.encoding_records() {
        if let Ok(subtable) = record.subtable(cmap.offset_data()) {
            codepoints.extend(
                subtable.iter().filter(|(_, gid)| gid.to_u32() != 0).map(|(cp, _)| cp),
            );
        }
    }
    Ok(codepoints)
}

/// Subsets `data` to `codepoints` (minus [`PROBLEMATIC_CODEPOINTS`]) and
/// compresses the result to WOFF2.
pub fn convert_to_woff2(data: &[u8], codepoints: &BTreeSet<u32>) -> Result<Vec<u8>> {
    let subsetter = Subsetter::webfont()
        .with_codepoints(codepoints.iter().copied())
        .without_codepoints(PROBLEMATIC_CODEPOINTS);

    if subsetter.codepoints().is_empty() {
        bail!("No valid codepoints found in font");
    }

    let subset = subsetter.subset(data).context("Failed to subset font for WOFF2")?;
    compress(&subset)
}

/// Compresses TTF data to WOFF2 without subsetting.
pub fn compress(ttf: &[u8]) -> Result<Vec<u8>> {
    encode(ttf, BrotliQuality::default()).map_err(|e| anyhow!("WOFF2 encoding failed: {e:?}"))
}
