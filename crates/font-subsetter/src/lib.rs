//! Font subsetting wrapper around hb-subset with builder pattern.
//!
//! Subsets are described by explicit codepoint sets, since webfont subsets
//! are computed by intersecting a script's ranges with what a font actually
//! maps. [`Script`] carries the unicode ranges used for those subsets.
//!
//! # Example
//!
//! ```no_run
//! use std::collections::BTreeSet;
//! use iosevka_font_subsetter::{Script, Subsetter};
//!
//! let font_data: &[u8] = &[];
//! let available: BTreeSet<u32> = (0x20..0x7F).collect();
//! let latin = Script::Latin.intersect(&available);
//! let subset = Subsetter::webfont().with_codepoints(latin).subset(font_data);
//! ```

mod scripts;
mod unicode_range;

use std::collections::BTreeSet;

use anyhow::{Result, bail};
use hb_subset::{Blob, FontFace, SubsetInput, Tag};

pub use scripts::Script;
pub use unicode_range::format_unicode_ranges;

/// Layout features kept in webfont subsets.
///
/// Iosevka ships its ligatures through `calt`, so that feature must survive
/// subsetting along with the usual shaping features.
pub const LAYOUT_FEATURES: &[&[u8; 4]] = &[
    b"aalt", b"ccmp", b"calt", b"dlig", b"liga", b"locl", b"kern", b"mark", b"mkmk", b"case",
    b"zero", b"frac", b"numr", b"dnom", b"sups", b"subs", b"sinf", b"ordn", b"ss01", b"ss02",
    b"ss03", b"ss04", b"ss05", b"ss06", b"ss07", b"ss08", b"ss09", b"ss10", b"ss11", b"ss12",
    b"ss13", b"ss14", b"ss15", b"ss16", b"ss17", b"ss18", b"ss20",
];

/// Font subsetter with builder pattern.
#[derive(Debug, Default, Clone)]
pub struct Subsetter {
    codepoints: BTreeSet<u32>,
    retain_glyph_names: bool,
    layout_features: Vec<[u8; 4]>,
}

impl Subsetter {
    /// Creates a subsetter with no codepoints and the standard [`LAYOUT_FEATURES`].
    pub fn new() -> Self {
        Self {
            layout_features: LAYOUT_FEATURES.iter().map(|f| **f).collect(),
            ..Default::default()
        }
    }

    /// Preset for webfont output: standard features, glyph names dropped.
    pub fn webfont() -> Self {
        Self::new().retain_glyph_names(false)
    }

    /// Adds individual codepoints to the subset.
    pub fn with_codepoints(mut self, codepoints: impl IntoIterator<Item = u32>) -> Self {
        self.codepoints.extend(codepoints);
        self
    }

    /// Adds inclusive `(start, end)` ranges to the subset.
    pub fn with_unicode_ranges(mut self, ranges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        for (start, end) in ranges {
            self.codepoints.extend(start..=end);
        }
        self
    }

    /// Removes codepoints from the subset, whichever way they were added.
    pub fn without_codepoints(mut self, codepoints: &[u32]) -> Self {
        for cp in codepoints {
            self.codepoints.remove(cp);
        }
        self
    }

    /// Sets whether to retain glyph names in the subset.
    pub fn retain_glyph_names(mut self, retain: bool) -> Self {
        self.retain_glyph_names = retain;
        self
    }

    /// Replaces the layout features to retain.
    pub fn with_layout_features(mut self, features: impl IntoIterator<Item = [u8; 4]>) -> Self {
        self.layout_features = features.into_iter().collect();
        self
    }

    pub fn codepoints(&self) -> &BTreeSet<u32> {
        &self.codepoints
    }

    /// Subsets the font data and returns the result.
    ///
    /// Fails when no codepoints were configured, since hb-subset would
    /// otherwise silently produce a font with only `.notdef`.
    pub fn subset(&self, data: &[u8]) -> Result<Vec<u8>> {
        if self.codepoints.is_empty() {
            bail!("No codepoints selected for subsetting");
        }

        let mut input = SubsetInput::new()?;

        if self.retain_glyph_names {
            input.flags().retain_glyph_names();
        }

        {
            let mut feature_set = input.layout_feature_tag_set();
            for tag in &self.layout_features {
                feature_set.insert(Tag::new(tag));
            }
        }

        {
            let mut unicode_set = input.unicode_set();
            for cp in &self.codepoints {
                if let Some(c) = char::from_u32(*cp) {
                    unicode_set.insert(c);
                }
            }
        }

        let font = FontFace::new(Blob::from_bytes(data)?)?;
        let subset_font = input.subset_font(&font)?;
        Ok(subset_font.underlying_blob().to_vec())
    }
}
