//! WOFF2 webfonts with per-script subsets and `@font-face` CSS.
//!
//! For each TTF in a family's `TTF/` directory this writes, into `WOFF2/`:
//!
//! - `<stem>.woff2`, the whole font
//! - `<stem>.<script>.woff2` for every [`Script`] the font covers with at
//!   least [`MIN_CHARS_FOR_SUBSET`] codepoints
//! - `<stem>.css` with one `@font-face` per subset
//!
//! and finally `<Family>.css` combining every variant.

mod css;
mod variant;

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use iosevka_font_subsetter::{Script, format_unicode_ranges};
use iosevka_font_woff2::{PROBLEMATIC_CODEPOINTS, available_codepoints, convert_to_woff2};
use log::debug;
use rayon::prelude::*;

pub use css::font_faces;
pub use variant::{FontVariant, SubsetFile};

use crate::{
    config::{MIN_CHARS_FOR_SUBSET, TTF_DIRNAME, WOFF2_DIRNAME},
    error::{Error, Result},
    io::{ensure_dir, file_name, glob_fonts, read_file, write_file},
};

/// What [`make_webfont`] wrote for one family.
#[derive(Debug, Clone)]
pub struct Webfont {
    pub name: String,
    pub dir: PathBuf,
    pub variants: Vec<FontVariant>,
    pub stylesheet: PathBuf,
}

impl Webfont {
    pub fn file_count(&self) -> usize {
        self.variants.iter().map(|v| 1 + v.subsets.len()).sum()
    }
}

/// Convert every font of `family_dir` to WOFF2 and write the stylesheets.
pub fn make_webfont(family_dir: &Path) -> Result<Webfont> {
    let name = file_name(family_dir)?.to_string();
    let woff_dir = family_dir.join(WOFF2_DIRNAME);
    ensure_dir(&woff_dir)?;

    let fonts = glob_fonts(&family_dir.join(TTF_DIRNAME))?;
    let variants = fonts
        .par_iter()
        .map(|ttf| convert_font(ttf, &woff_dir))
        .collect::<Result<Vec<_>>>()?;

    let mut stylesheet = String::new();
    for variant in &variants {
        if variant.subsets.is_empty() {
            continue;
        }
        let css = font_faces(&name, variant);
        write_file(variant.file.with_extension("css"), &css)?;
        stylesheet.push_str(&css);
    }

    let stylesheet_path = woff_dir.join(format!("{name}.css"));
    write_file(&stylesheet_path, &stylesheet)?;

    Ok(Webfont { name, dir: woff_dir, variants, stylesheet: stylesheet_path })
}

/// Write the full WOFF2 and its script subsets for one TTF.
fn convert_font(ttf: &Path, woff_dir: &Path) -> Result<FontVariant> {
    let font_error =
        |e: anyhow::Error| Error::font(format!("failed to convert {} to WOFF2", ttf.display()), e);

    let data = read_file(ttf)?;
    let codepoints = available_codepoints(&data).map_err(font_error)?;
    let stem = ttf.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();

    let output = woff_dir.join(format!("{stem}.woff2"));
    write_file(&output, convert_to_woff2(&data, &codepoints).map_err(font_error)?)?;

    let mut variant = FontVariant::from_file_path(&output);
    variant.subsets = Script::ALL
        .par_iter()
        .filter_map(|&script| {
            let Some(selected) = subset_codepoints(script, &codepoints) else {
                debug!("Skipping {script} subset of {stem}");
                return None;
            };

            let file = woff_dir.join(format!("{stem}.{script}.woff2"));
            let written = convert_to_woff2(&data, &selected)
                .map_err(font_error)
                .and_then(|woff2| write_file(&file, woff2));
            Some(written.map(|()| SubsetFile {
                file,
                unicode_range: format_unicode_ranges(selected.iter().copied()),
            }))
        })
        .collect::<Result<Vec<_>>>()?;

    println!(
        "  {} -> {} ({} subsets)",
        ttf.display(),
        output.display(),
        variant.subsets.len()
    );
    Ok(variant)
}

/// Codepoints of `script` the font covers, or `None` when too few remain
/// to be worth a separate file.
fn subset_codepoints(script: Script, available: &BTreeSet<u32>) -> Option<BTreeSet<u32>> {
    let mut selected = script.intersect(available);
    for cp in PROBLEMATIC_CODEPOINTS {
        selected.remove(cp);
    }
    (selected.len() >= MIN_CHARS_FOR_SUBSET).then_some(selected)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_subset_needs_minimum_coverage() {
        let latin: BTreeSet<u32> = ('a'..='h').map(u32::from).collect();
        let selected = subset_codepoints(Script::Latin, &latin).unwrap();
        assert_eq!(selected.len(), MIN_CHARS_FOR_SUBSET);

        let short: BTreeSet<u32> = latin.iter().copied().skip(1).collect();
        assert!(subset_codepoints(Script::Latin, &short).is_none());
        assert!(subset_codepoints(Script::Greek, &latin).is_none());
    }

    #[test]
    fn test_subset_drops_problematic_codepoints() {
        let available: BTreeSet<u32> =
            ('a'..='z').map(u32::from).chain(PROBLEMATIC_CODEPOINTS.iter().copied()).collect();
        for script in Script::ALL {
            if let Some(selected) = subset_codepoints(script, &available) {
                assert!(PROBLEMATIC_CODEPOINTS.iter().all(|cp| !selected.contains(cp)));
            }
        }
    }

    #[test]
    fn test_family_webfont() {
        let temp = tempdir().unwrap();
        let family = temp.path().join("Iosevka");
        fs::create_dir_all(family.join("TTF")).unwrap();
        fs::write(family.join("TTF/Iosevka-Bold.ttf"), font_test_data::VAZIRMATN_VAR).unwrap();

        let webfont = make_webfont(&family).unwrap();
        assert_eq!(webfont.dir, family.join("WOFF2"));
        assert_eq!(webfont.variants.len(), 1);

        let woff2 = fs::read(family.join("WOFF2/Iosevka-Bold.woff2")).unwrap();
        assert_eq!(&woff2[..4], b"wOF2");

        let variant = &webfont.variants[0];
        assert_eq!(variant.weight, 700);
        assert_eq!(webfont.file_count(), 1 + variant.subsets.len());

        let available = available_codepoints(font_test_data::VAZIRMATN_VAR).unwrap();
        for script in Script::ALL {
            let file = family.join(format!("WOFF2/Iosevka-Bold.{script}.woff2"));
            assert_eq!(file.is_file(), subset_codepoints(script, &available).is_some(), "{script}");
        }

        let stylesheet = fs::read_to_string(&webfont.stylesheet).unwrap();
        assert_eq!(stylesheet, font_faces("Iosevka", variant));
        if variant.subsets.is_empty() {
            assert!(!family.join("WOFF2/Iosevka-Bold.css").exists());
        } else {
            assert!(stylesheet.contains("font-family:\"Iosevka\""));
            assert!(stylesheet.contains("font-weight:700"));
            let variant_css = fs::read_to_string(family.join("WOFF2/Iosevka-Bold.css")).unwrap();
            assert_eq!(variant_css, stylesheet);
        }
    }

    #[test]
    fn test_family_without_fonts_writes_empty_stylesheet() {
        let temp = tempdir().unwrap();
        let family = temp.path().join("Iosevka");
        fs::create_dir_all(family.join("TTF")).unwrap();

        let webfont = make_webfont(&family).unwrap();
        assert_eq!(webfont.name, "Iosevka");
        assert!(webfont.variants.is_empty());
        assert_eq!(webfont.file_count(), 0);
        assert_eq!(fs::read_to_string(family.join("WOFF2/Iosevka.css")).unwrap(), "");
    }

    #[test]
    fn test_invalid_font_reports_path() {
        let temp = tempdir().unwrap();
        let family = temp.path().join("Iosevka");
        fs::create_dir_all(family.join("TTF")).unwrap();
        fs::write(family.join("TTF/Iosevka-Regular.ttf"), b"garbage").unwrap();

        let err = make_webfont(&family).unwrap_err();
        assert!(matches!(err, Error::Font { .. }));
        assert!(err.to_string().contains("Iosevka-Regular.ttf"));
    }
}
