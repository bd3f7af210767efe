//! Rendering plans into the toolchain's `private-build-plans.toml` schema.

use indexmap::IndexMap;
use serde::Serialize;

use super::{BuildConfiguration, BuildPlan, Ligations, Serifs, Spacing, VariantSet};
use crate::{
    error::{Error, Result},
    plans::catalog::{Slope, Weight},
};

const HEADER: &str = "# Generated by iosevka-custom from build-plans.toml. Do not edit.\n\n";

#[derive(Serialize)]
struct PlansDocument<'a> {
    #[serde(rename = "buildPlans")]
    build_plans: IndexMap<&'a str, RenderedPlan<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderedPlan<'a> {
    family: &'a str,
    spacing: Spacing,
    serifs: Serifs,
    no_cv_ss: bool,
    export_glyph_names: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    variants: Option<&'a VariantSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ligations: Option<&'a Ligations>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    weights: IndexMap<&'static str, &'static Weight>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    slopes: IndexMap<&'static str, &'static Slope>,
}

impl<'a> From<&'a BuildPlan> for RenderedPlan<'a> {
    fn from(plan: &'a BuildPlan) -> Self {
        Self {
            family: &plan.family,
            spacing: plan.spacing,
            serifs: plan.serifs,
            no_cv_ss: plan.no_cv_ss,
            export_glyph_names: plan.export_glyph_names,
            variants: plan.variants.as_ref(),
            ligations: plan.ligations.as_ref(),
            weights: plan.weights.iter().map(|w| (w.name, *w)).collect(),
            slopes: plan.slopes.iter().map(|s| (s.name, *s)).collect(),
        }
    }
}

impl BuildConfiguration {
    /// Serialize every plan as `[buildPlans.<Plan>]`.
    pub fn render(&self) -> Result<String> {
        let document = PlansDocument {
            build_plans: self
                .plans
                .iter()
                .map(|p| (p.name.as_str(), RenderedPlan::from(p)))
                .collect(),
        };
        let body = toml::to_string_pretty(&document)
            .map_err(|e| Error::config(format!("cannot render build plans: {e}")))?;
        Ok(format!("{HEADER}{body}"))
    }
}
