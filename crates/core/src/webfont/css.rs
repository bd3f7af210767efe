//! `@font-face` rules for WOFF2 webfonts.

use std::path::Path;

use super::variant::FontVariant;

/// One rule per subset of `variant`, concatenated without separators.
///
/// `src` URLs are file names: the CSS is written next to the fonts.
pub fn font_faces(family: &str, variant: &FontVariant) -> String {
    let mut base = vec![
        ("font-family", quote(family)),
        ("font-weight", variant.weight.to_string()),
        ("font-style", variant.style.to_string()),
    ];
    if let Some(stretch) = variant.stretch {
        base.push(("font-stretch", stretch.to_string()));
    }

    variant
        .subsets
        .iter()
        .map(|subset| {
            let mut props = base.clone();
            props.push(("unicode-range", subset.unicode_range.join(",")));
            props.push(("src", source(&subset.file)));
            font_face(&props)
        })
        .collect()
}

fn font_face(props: &[(&str, String)]) -> String {
    let body: Vec<String> = props.iter().map(|(key, value)| format!("{key}:{value}")).collect();
    format!("@font-face{{{}}}", body.join(";"))
}

fn source(file: &Path) -> String {
    let name = file.file_name().map(|s| s.to_string_lossy()).unwrap_or_default();
    format!("url({}) format(\"woff2\")", quote(&name))
}

/// A double-quoted CSS string.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\a "),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
