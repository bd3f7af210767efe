//! Weight, style and stretch of a font, read from its file name.

use std::path::{Path, PathBuf};

use log::warn;

/// Weight-name prefixes of the style suffix, checked in order.
const WEIGHT_PREFIXES: &[(&str, u16)] = &[
    ("thin", 100),
    ("extralight", 200),
    ("light", 300),
    ("semilight", 350),
    ("normal", 400),
    ("regular", 400),
    ("italic", 400),
    ("oblique", 400),
    ("book", 450),
    ("medium", 500),
    ("semibold", 600),
    ("bold", 700),
    ("extrabold", 800),
    ("black", 900),
    ("heavy", 900),
];

/// Width prefixes Iosevka puts in front of the weight, longest first.
const WIDTH_PREFIXES: &[(&str, &str)] = &[
    ("extracondensed", "extra-condensed"),
    ("semicondensed", "semi-condensed"),
    ("condensed", "condensed"),
    ("extraextended", "extra-expanded"),
    ("semiextended", "semi-expanded"),
    ("extended", "expanded"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetFile {
    pub file: PathBuf,
    pub unicode_range: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontVariant {
    pub file: PathBuf,
    pub weight: u16,
    pub style: &'static str,
    pub stretch: Option<&'static str>,
    pub subsets: Vec<SubsetFile>,
}

impl FontVariant {
    /// `Iosevka Custom-ExtendedBoldItalic.woff2` is weight 700, italic,
    /// expanded. Unknown weights fall back to 400.
    pub fn from_file_path(path: &Path) -> Self {
        let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        let params = stem.rsplit('-').next().unwrap_or_default().to_lowercase();

        let (stretch, rest) = WIDTH_PREFIXES
            .iter()
            .find_map(|(prefix, css)| params.strip_prefix(prefix).map(|rest| (Some(*css), rest)))
            .unwrap_or((None, params.as_str()));

        let weight = if rest.is_empty() {
            400
        } else {
            weight_from_params(rest).unwrap_or_else(|| {
                warn!("Unknown weight `{params}` for {}, using 400", path.display());
                400
            })
        };

        let style = if params.contains("italic") {
            "italic"
        } else if params.contains("oblique") {
            "oblique"
        } else {
            "normal"
        };

        Self { file: path.to_path_buf(), weight, style, stretch, subsets: Vec::new() }
    }
}

fn weight_from_params(params: &str) -> Option<u16> {
    WEIGHT_PREFIXES
        .iter()
        .find(|(prefix, _)| params.starts_with(prefix))
        .map(|(_, weight)| *weight)
}
