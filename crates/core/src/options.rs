//! Post-build output switches.

use serde::Deserialize;

use crate::config::{NERD_FONT_FLAGS, NERD_FONT_IMAGE};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct OutputOptions {
    /// Keep the `*-Unhinted` directories the toolchain writes.
    pub keep_unhinted: bool,
    /// `<Family>/<Family>.ttc`
    pub ttc: bool,
    /// `<Family>/<Family>.zip`
    pub zip: bool,
    /// `<Family>/WOFF2/` with subsets and CSS.
    pub webfonts: bool,
    /// `dist/all-ttc.zip`
    pub archive: bool,
    pub nerd_fonts: NerdFontOptions,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            keep_unhinted: false,
            ttc: true,
            zip: true,
            webfonts: true,
            archive: true,
            nerd_fonts: NerdFontOptions::default(),
        }
    }
}

impl OutputOptions {
    /// Problems that make these options unusable.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.nerd_fonts.enabled && self.nerd_fonts.image.trim().is_empty() {
            problems.push("output.nerd_fonts.image must not be empty".to_string());
        }
        if self.archive && !self.ttc {
            problems.push("output.archive requires output.ttc".to_string());
        }
        problems
    }
}

/// Nerd Font patching through the patcher's docker image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct NerdFontOptions {
    pub enabled: bool,
    pub image: String,
    pub flags: Vec<String>,
}

impl Default for NerdFontOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            image: NERD_FONT_IMAGE.to_string(),
            flags: NERD_FONT_FLAGS.iter().map(|f| f.to_string()).collect(),
        }
    }
}
