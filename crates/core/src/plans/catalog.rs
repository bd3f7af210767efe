//! Identifiers the Iosevka toolchain accepts.

use serde::Serialize;

/// A named weight and the values the toolchain needs for it.
#[derive(Debug, PartialEq, Serialize)]
pub struct Weight {
    #[serde(skip)]
    pub name: &'static str,
    pub shape: u16,
    pub menu: u16,
    pub css: u16,
}

/// A named slope.
#[derive(Debug, PartialEq, Serialize)]
pub struct Slope {
    #[serde(skip)]
    pub name: &'static str,
    pub angle: f64,
    pub shape: &'static str,
    pub menu: &'static str,
    pub css: &'static str,
}

const fn weight(name: &'static str, value: u16) -> Weight {
    Weight { name, shape: value, menu: value, css: value }
}

pub const WEIGHTS: &[Weight] = &[
    weight("Thin", 100),
    weight("ExtraLight", 200),
    weight("Light", 300),
    weight("SemiLight", 350),
    weight("Regular", 400),
    weight("Book", 450),
    weight("Medium", 500),
    weight("SemiBold", 600),
    weight("Bold", 700),
    weight("ExtraBold", 800),
    weight("Heavy", 900),
];

pub const SLOPES: &[Slope] = &[
    Slope { name: "Upright", angle: 0.0, shape: "upright", menu: "upright", css: "normal" },
    Slope { name: "Italic", angle: 9.4, shape: "italic", menu: "italic", css: "italic" },
    Slope { name: "Oblique", angle: 9.4, shape: "oblique", menu: "oblique", css: "oblique" },
];

/// Ligation sets a plan may inherit.
pub const LIGATION_SETS: &[&str] = &[
    "default-calt",
    "dlig",
    "clike",
    "javascript",
    "php",
    "ml",
    "fsharp",
    "fstar",
    "haskell",
    "idris",
    "elm",
    "purescript",
    "swift",
    "coq",
    "matlab",
    "verilog",
    "wolfram",
    "erlang",
    "julia",
    "tlaplus",
];

pub fn find_weight(name: &str) -> Option<&'static Weight> {
    WEIGHTS.iter().find(|w| w.name == name)
}

pub fn find_slope(name: &str) -> Option<&'static Slope> {
    SLOPES.iter().find(|s| s.name == name)
}

pub fn is_ligation_set(name: &str) -> bool {
    LIGATION_SETS.contains(&name)
}

/// `ss01` through `ss20`.
pub fn is_stylistic_set(name: &str) -> bool {
    name.len() == 4
        && name.starts_with("ss")
        && name[2..].bytes().all(|b| b.is_ascii_digit())
        && matches!(name[2..].parse::<u8>(), Ok(1..=20))
}

/// Selector keys and values: lowercase ASCII words joined by `-`.
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.ends_with('-')
        && name.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Plan names end up in directory names and `ttf::<Plan>` targets.
pub fn is_plan_name(name: &str) -> bool {
    name.bytes().next().is_some_and(|b| b.is_ascii_alphabetic())
        && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}
