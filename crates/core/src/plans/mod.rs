//! Build plans: the typed `build-plans.toml` source and its validation.
//!
//! The source file is deserialized strictly, then every name it uses is
//! checked against [`catalog`] before anything runs. The result is an
//! immutable [`BuildConfiguration`] which [`render`] turns into the
//! toolchain's own `private-build-plans.toml`.

pub mod catalog;
pub mod render;

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    config::TTF_TARGET_PREFIX,
    error::{Error, Result},
    options::OutputOptions,
    source::SourceSpec,
};
use catalog::{Slope, Weight};

/// Glyph spacing of a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Spacing {
    #[default]
    Normal,
    QuasiProportional,
    Term,
    FontconfigMono,
    Fixed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Serifs {
    #[default]
    Sans,
    Slab,
}

/// A named character-variant preset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VariantSet {
    /// Stylistic set (`ss01`..`ss20`) the selectors apply on top of.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub design: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub upright: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub italic: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub oblique: IndexMap<String, String>,
}

impl VariantSet {
    fn problems(&self, name: &str) -> Vec<String> {
        let mut problems = Vec::new();
        if let Some(set) = self.inherits.as_deref().filter(|s| !catalog::is_stylistic_set(s)) {
            problems.push(format!("variant set {name:?} inherits unknown stylistic set {set:?}"));
        }
        let selectors = [
            ("design", &self.design),
            ("upright", &self.upright),
            ("italic", &self.italic),
            ("oblique", &self.oblique),
        ];
        for (slot, map) in selectors {
            for (key, value) in map {
                if !catalog::is_identifier(key) {
                    problems
                        .push(format!("variant set {name:?} has invalid {slot} selector {key:?}"));
                }
                if !catalog::is_identifier(value) {
                    problems.push(format!(
                        "variant set {name:?} has invalid {slot} value {value:?} for {key:?}"
                    ));
                }
            }
        }
        problems
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Ligations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enables: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disables: Vec<String>,
}

/// One plan as written in `build-plans.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlanSource {
    family: String,
    #[serde(default)]
    spacing: Spacing,
    #[serde(default)]
    serifs: Serifs,
    #[serde(default = "default_true")]
    no_cv_ss: bool,
    #[serde(default)]
    export_glyph_names: bool,
    /// Name of a `[variants.<name>]` preset, or a stylistic set.
    #[serde(default)]
    variants: Option<String>,
    #[serde(default)]
    ligations: Option<Ligations>,
    #[serde(default)]
    weights: Vec<String>,
    #[serde(default)]
    slopes: Vec<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BuildPlansFile {
    #[serde(default)]
    source: SourceSpec,
    #[serde(default)]
    output: OutputOptions,
    #[serde(default)]
    variants: IndexMap<String, VariantSet>,
    #[serde(default)]
    plans: IndexMap<String, PlanSource>,
}

/// A validated plan, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildPlan {
    pub name: String,
    pub family: String,
    pub spacing: Spacing,
    pub serifs: Serifs,
    pub no_cv_ss: bool,
    pub export_glyph_names: bool,
    pub variants: Option<VariantSet>,
    pub ligations: Option<Ligations>,
    /// Empty means the toolchain's defaults.
    pub weights: Vec<&'static Weight>,
    pub slopes: Vec<&'static Slope>,
}

impl BuildPlan {
    /// `ttf::<Plan>` target for `npm run build`.
    pub fn target(&self) -> String {
        format!("{TTF_TARGET_PREFIX}{}", self.name)
    }
}

/// Everything one invocation builds, resolved from `build-plans.toml`.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfiguration {
    pub source: SourceSpec,
    pub output: OutputOptions,
    pub plans: Vec<BuildPlan>,
}

impl BuildConfiguration {
    /// Read and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&text).map_err(|e| match e {
            Error::Configuration(message) => {
                Error::config(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    /// Parse and validate configuration text.
    pub fn parse(text: &str) -> Result<Self> {
        let file: BuildPlansFile = toml::from_str(text).map_err(|e| Error::config(e.to_string()))?;
        resolve(file)
    }

    pub fn targets(&self) -> Vec<String> {
        self.plans.iter().map(BuildPlan::target).collect()
    }

    pub fn plan_names(&self) -> impl Iterator<Item = &str> {
        self.plans.iter().map(|p| p.name.as_str())
    }
}

fn resolve(file: BuildPlansFile) -> Result<BuildConfiguration> {
    let mut problems = file.source.problems();
    problems.extend(file.output.problems());

    for (name, set) in &file.variants {
        if !catalog::is_identifier(name) {
            problems.push(format!("variant set name {name:?} is invalid"));
        }
        problems.extend(set.problems(name));
    }

    if file.plans.is_empty() {
        problems.push("no build plans defined".to_string());
    }

    let mut plans = Vec::with_capacity(file.plans.len());
    for (name, plan) in file.plans {
        match resolve_plan(&name, plan, &file.variants) {
            Ok(plan) => plans.push(plan),
            Err(plan_problems) => problems.extend(plan_problems),
        }
    }

    if !problems.is_empty() {
        return Err(Error::config(problems.join("; ")));
    }

    Ok(BuildConfiguration { source: file.source, output: file.output, plans })
}

fn resolve_plan(
    name: &str,
    plan: PlanSource,
    presets: &IndexMap<String, VariantSet>,
) -> std::result::Result<BuildPlan, Vec<String>> {
    let mut problems = Vec::new();

    if !catalog::is_plan_name(name) {
        problems.push(format!("plan name {name:?} must be ASCII letters, digits or '-'"));
    }
    if plan.family.trim().is_empty() {
        problems.push(format!("plan {name:?} has an empty family name"));
    }

    let variants = match plan.variants.as_deref() {
        None => None,
        Some(preset) => match presets.get(preset) {
            Some(set) => Some(set.clone()),
            None if catalog::is_stylistic_set(preset) => {
                Some(VariantSet { inherits: Some(preset.to_string()), ..VariantSet::default() })
            }
            None => {
                problems.push(format!("plan {name:?} uses undefined variant set {preset:?}"));
                None
            }
        },
    };

    if let Some(ligations) = &plan.ligations {
        if let Some(set) = ligations.inherits.as_deref().filter(|s| !catalog::is_ligation_set(s)) {
            problems.push(format!("plan {name:?} inherits unknown ligation set {set:?}"));
        }
        for feature in ligations.enables.iter().chain(&ligations.disables) {
            if !catalog::is_identifier(feature) {
                problems.push(format!("plan {name:?} has invalid ligation {feature:?}"));
            }
        }
    }

    let weights = lookup_all(name, "weight", &plan.weights, catalog::find_weight, &mut problems);
    let slopes = lookup_all(name, "slope", &plan.slopes, catalog::find_slope, &mut problems);

    if !problems.is_empty() {
        return Err(problems);
    }

    Ok(BuildPlan {
        name: name.to_string(),
        family: plan.family,
        spacing: plan.spacing,
        serifs: plan.serifs,
        no_cv_ss: plan.no_cv_ss,
        export_glyph_names: plan.export_glyph_names,
        variants,
        ligations: plan.ligations,
        weights,
        slopes,
    })
}

fn lookup_all<T>(
    plan: &str,
    kind: &str,
    names: &[String],
    find: fn(&str) -> Option<&'static T>,
    problems: &mut Vec<String>,
) -> Vec<&'static T> {
    let mut found = Vec::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            problems.push(format!("plan {plan:?} lists {kind} {name:?} twice"));
            continue;
        }
        match find(name) {
            Some(item) => found.push(item),
            None => problems.push(format!("plan {plan:?} uses unknown {kind} {name:?}")),
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{DirtyPolicy, Reference};

    const MINIMAL: &str = r#"
        [plans.IosevkaCustom]
        family = "Iosevka Custom"
    "#;

    fn problem(text: &str) -> String {
        match BuildConfiguration::parse(text) {
            Err(Error::Configuration(message)) => message,
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_minimal_configuration_uses_defaults() {
        let config = BuildConfiguration::parse(MINIMAL).unwrap();
        assert_eq!(config.source, SourceSpec::default());
        assert_eq!(config.output, OutputOptions::default());
        assert_eq!(config.targets(), ["ttf::IosevkaCustom"]);

        let plan = &config.plans[0];
        assert_eq!(plan.family, "Iosevka Custom");
        assert_eq!(plan.spacing, Spacing::Normal);
        assert_eq!(plan.serifs, Serifs::Sans);
        assert!(plan.no_cv_ss);
        assert!(plan.variants.is_none());
        assert!(plan.weights.is_empty());
    }

    #[test]
    fn test_full_configuration() {
        let config = BuildConfiguration::parse(
            r#"
            [source]
            url = "https://example.com/Iosevka.git"
            reference = { tag = "v33.2.0" }
            depth = 0
            dirty = "fail"

            [output]
            keep_unhinted = true
            webfonts = false
            nerd_fonts = { enabled = true }

            [variants.everyday]
            inherits = "ss08"
            design = { g = "double-storey", zero = "slashed" }
            italic = { a = "single-storey-serifless" }

            [plans.IosevkaTerm]
            family = "Iosevka Term"
            spacing = "term"
            serifs = "slab"
            variants = "everyday"
            ligations = { inherits = "haskell", disables = ["arrow-l"] }
            weights = ["Regular", "Bold"]
            slopes = ["Upright", "Italic"]

            [plans.IosevkaAile]
            family = "Iosevka Aile"
            spacing = "quasi-proportional"
            variants = "ss05"
            "#,
        )
        .unwrap();

        assert_eq!(config.source.reference, Reference::Tag("v33.2.0".into()));
        assert_eq!(config.source.depth, 0);
        assert_eq!(config.source.dirty, DirtyPolicy::Fail);
        assert!(config.output.keep_unhinted);
        assert!(!config.output.webfonts);
        assert!(config.output.nerd_fonts.enabled);
        assert_eq!(config.output.nerd_fonts.image, "nerdfonts/patcher");

        let names: Vec<_> = config.plan_names().collect();
        assert_eq!(names, ["IosevkaTerm", "IosevkaAile"]);

        let term = &config.plans[0];
        assert_eq!(term.serifs, Serifs::Slab);
        let variants = term.variants.as_ref().unwrap();
        assert_eq!(variants.inherits.as_deref(), Some("ss08"));
        assert_eq!(variants.design.keys().collect::<Vec<_>>(), ["g", "zero"]);
        let weights: Vec<_> = term.weights.iter().map(|w| w.name).collect();
        assert_eq!(weights, ["Regular", "Bold"]);

        let aile = &config.plans[1];
        assert_eq!(aile.spacing, Spacing::QuasiProportional);
        assert_eq!(aile.variants.as_ref().unwrap().inherits.as_deref(), Some("ss05"));
    }

    #[test]
    fn test_undefined_variant_set() {
        let message = problem(
            r#"
            [plans.IosevkaCustom]
            family = "Iosevka Custom"
            variants = "missing"
            "#,
        );
        assert!(message.contains("undefined variant set \"missing\""), "{message}");
    }

    #[test]
    fn test_unknown_identifiers_are_all_reported() {
        let message = problem(
            r#"
            [variants.mine]
            inherits = "ss42"
            design = { G = "x" }

            [plans.IosevkaCustom]
            family = "Iosevka Custom"
            ligations = { inherits = "cobol" }
            weights = ["Regular", "Hairline", "Regular"]
            slopes = ["Backslant"]
            "#,
        );
        for expected in [
            "unknown stylistic set \"ss42\"",
            "invalid design selector \"G\"",
            "unknown ligation set \"cobol\"",
            "unknown weight \"Hairline\"",
            "weight \"Regular\" twice",
            "unknown slope \"Backslant\"",
        ] {
            assert!(message.contains(expected), "missing {expected:?} in {message}");
        }
    }

    #[test]
    fn test_malformed_sources() {
        assert!(!problem("[plans.X\n").is_empty());
        assert!(problem("").contains("no build plans defined"));
        assert!(problem("[plans.X]\nfamily = \"X\"\ncolour = 1\n").contains("colour"));
        assert!(problem("[plans.X]\nfamily = \"X\"\nspacing = \"wide\"\n").contains("wide"));
        assert!(problem("[plans.\"My Font\"]\nfamily = \"X\"\n").contains("plan name"));
        assert!(problem("[source]\nreference = { commit = \"abc\" }\n[plans.X]\nfamily = \"X\"\n")
            .contains("40-digit"));
    }

    #[test]
    fn test_load_missing_file_is_configuration_error() {
        let err = BuildConfiguration::load(Path::new("/nonexistent/build-plans.toml")).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
