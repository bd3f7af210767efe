//! Pipeline step definitions.

use log::info;
use rayon::prelude::*;

use super::PipelineContext;
use crate::{
    artifacts,
    config::{ALL_TTC_ARCHIVE, NERD_FONT_SUFFIX},
    error::Result,
    io::{file_name, list_dirs, write_file},
    nerd,
    package::{self, FamilyPackage},
    source, toolchain, webfont,
};

pub type PipelineStep = (&'static str, fn(&mut PipelineContext<'_>) -> Result<()>);

/// Source to verified TTFs.
pub const BUILD_STEPS: &[PipelineStep] = &[
    ("acquire-source", step_acquire_source),
    ("render-config", step_render_config),
    ("install-dependencies", step_install_dependencies),
    ("build-fonts", step_build_fonts),
    ("collect-artifacts", step_collect_artifacts),
];

/// Packaging of the collected TTFs; each step honours its output switch.
pub const POST_STEPS: &[PipelineStep] = &[
    ("patch-nerd-fonts", step_patch_nerd_fonts),
    ("package-families", step_package_families),
    ("make-webfonts", step_make_webfonts),
    ("archive-ttc", step_archive_ttc),
];

fn skipped(reason: &str) -> Result<()> {
    println!("  Skipped ({reason})");
    Ok(())
}

fn step_acquire_source(ctx: &mut PipelineContext<'_>) -> Result<()> {
    let acquired = source::acquire(ctx.runner, &ctx.config.source, &ctx.layout.repo_dir)?;
    println!("  {} {}", ctx.config.source.url, acquired);
    ctx.report.head = Some(acquired.head().to_string());
    ctx.acquired = Some(acquired);
    Ok(())
}

fn step_render_config(ctx: &mut PipelineContext<'_>) -> Result<()> {
    let rendered = ctx.config.render()?;
    write_file(&ctx.layout.rendered_plans, rendered)?;
    println!(
        "  Wrote {} ({} plans)",
        ctx.layout.rendered_plans.display(),
        ctx.config.plans.len()
    );
    Ok(())
}

fn step_install_dependencies(ctx: &mut PipelineContext<'_>) -> Result<()> {
    let changed = ctx.acquired.as_ref().is_none_or(|a| a.changed());
    toolchain::install_dependencies(ctx.runner, &ctx.layout.repo_dir, changed)?;
    Ok(())
}

fn step_build_fonts(ctx: &mut PipelineContext<'_>) -> Result<()> {
    toolchain::build_fonts(ctx.runner, &ctx.layout.repo_dir, &ctx.config.targets())
}

fn step_collect_artifacts(ctx: &mut PipelineContext<'_>) -> Result<()> {
    let families = artifacts::collect(&ctx.layout.dist_dir, &ctx.config.plans)?;
    for family in &families {
        println!("  {}: {} fonts", family.plan, family.fonts.len());
    }

    if !ctx.config.output.keep_unhinted {
        for dir in artifacts::prune_unhinted(&ctx.layout.dist_dir)? {
            info!("Removed {}", dir.display());
        }
    }

    ctx.report.families = families;
    Ok(())
}

fn step_patch_nerd_fonts(ctx: &mut PipelineContext<'_>) -> Result<()> {
    let options = &ctx.config.output.nerd_fonts;
    if !options.enabled {
        return skipped("nerd_fonts.enabled = false");
    }
    ctx.report.nerd_fonts = nerd::patch_all(ctx.runner, &ctx.layout.dist_dir, options)?;
    Ok(())
}

fn step_package_families(ctx: &mut PipelineContext<'_>) -> Result<()> {
    let output = &ctx.config.output;
    if !output.ttc && !output.zip {
        return skipped("ttc and zip disabled");
    }

    let families = list_dirs(&ctx.layout.dist_dir)?;
    let packages = families
        .par_iter()
        .map(|family| package::package_family(family, output))
        .collect::<Result<Vec<FamilyPackage>>>()?;

    ctx.report.packages =
        packages.into_iter().flat_map(|p| p.ttc.into_iter().chain(p.zip)).collect();
    Ok(())
}

fn step_make_webfonts(ctx: &mut PipelineContext<'_>) -> Result<()> {
    if !ctx.config.output.webfonts {
        return skipped("webfonts = false");
    }

    for family in list_dirs(&ctx.layout.dist_dir)? {
        if file_name(&family)?.ends_with(NERD_FONT_SUFFIX) {
            continue;
        }
        let webfont = webfont::make_webfont(&family)?;
        println!("  {}: {} WOFF2 files", webfont.name, webfont.file_count());
        ctx.report.webfont_files += webfont.file_count();
    }
    Ok(())
}

fn step_archive_ttc(ctx: &mut PipelineContext<'_>) -> Result<()> {
    if !ctx.config.output.archive {
        return skipped("archive = false");
    }

    let output = ctx.layout.dist_dir.join(ALL_TTC_ARCHIVE);
    let count = package::archive_collections(&ctx.layout.dist_dir, &output)?;
    if count == 0 {
        return skipped("no collections");
    }
    println!("  Archived {count} collections to {}", output.display());
    ctx.report.archive = Some(output);
    Ok(())
}
