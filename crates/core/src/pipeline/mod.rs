//! Build pipeline for custom Iosevka fonts.

mod clean;
mod steps;

pub use clean::clean;
pub use steps::{BUILD_STEPS, POST_STEPS, PipelineStep};

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use crate::{
    artifacts::FamilyArtifacts,
    config::{DIST_DIRNAME, RENDERED_PLANS_FILENAME, REPO_DIRNAME},
    error::Result,
    exec::CommandRunner,
    plans::BuildConfiguration,
    source::Acquired,
};

/// Paths derived from the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub work_dir: PathBuf,
    pub repo_dir: PathBuf,
    pub dist_dir: PathBuf,
    pub rendered_plans: PathBuf,
}

impl Layout {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        let work_dir = work_dir.into();
        let repo_dir = work_dir.join(REPO_DIRNAME);
        let dist_dir = repo_dir.join(DIST_DIRNAME);
        let rendered_plans = repo_dir.join(RENDERED_PLANS_FILENAME);
        Self { work_dir, repo_dir, dist_dir, rendered_plans }
    }
}

/// What a finished build produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Commit the fonts were built from.
    pub head: Option<String>,
    pub families: Vec<FamilyArtifacts>,
    pub nerd_fonts: Vec<PathBuf>,
    pub packages: Vec<PathBuf>,
    pub webfont_files: usize,
    pub archive: Option<PathBuf>,
}

impl BuildReport {
    pub fn font_count(&self) -> usize {
        self.families.iter().map(|f| f.fonts.len()).sum()
    }
}

pub struct PipelineContext<'a> {
    pub runner: &'a dyn CommandRunner,
    pub config: &'a BuildConfiguration,
    pub layout: Layout,
    pub acquired: Option<Acquired>,
    pub report: BuildReport,
}

impl<'a> PipelineContext<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        config: &'a BuildConfiguration,
        layout: Layout,
    ) -> Self {
        Self { runner, config, layout, acquired: None, report: BuildReport::default() }
    }
}

pub fn run_step(
    name: &str,
    step_num: usize,
    total: usize,
    ctx: &mut PipelineContext<'_>,
    f: impl Fn(&mut PipelineContext<'_>) -> Result<()>,
) -> Result<()> {
    println!("\n[{step_num}/{total}] {name}");
    let start = Instant::now();
    f(ctx)?;
    println!("  ✓ {name} ({:.2}s)", start.elapsed().as_secs_f64());
    Ok(())
}

pub fn run_steps(
    steps: &[PipelineStep],
    ctx: &mut PipelineContext<'_>,
    offset: usize,
    total: usize,
) -> Result<()> {
    for (i, (name, step_fn)) in steps.iter().enumerate() {
        run_step(name, offset + i + 1, total, ctx, step_fn)?;
    }
    Ok(())
}

/// Load `config_path` and run the full pipeline in `work_dir`.
///
/// The configuration is validated before any command runs.
pub fn build_from_file(
    runner: &dyn CommandRunner,
    config_path: &Path,
    work_dir: &Path,
) -> Result<BuildReport> {
    let config = BuildConfiguration::load(config_path)?;
    build_all(runner, &config, work_dir)
}

pub fn build_all(
    runner: &dyn CommandRunner,
    config: &BuildConfiguration,
    work_dir: &Path,
) -> Result<BuildReport> {
    let mut ctx = PipelineContext::new(runner, config, Layout::new(work_dir));
    let start = Instant::now();

    println!("═══════════════════════════════════════════════════════════════════════════════");
    println!("Iosevka Custom Build Pipeline");
    println!("   Plans: {}", config.plan_names().collect::<Vec<_>>().join(", "));
    println!("═══════════════════════════════════════════════════════════════════════════════");

    let total = BUILD_STEPS.len() + POST_STEPS.len();

    run_steps(BUILD_STEPS, &mut ctx, 0, total)?;
    run_steps(POST_STEPS, &mut ctx, BUILD_STEPS.len(), total)?;

    let report = ctx.report;
    println!("\n═══════════════════════════════════════════════════════════════════════════════");
    println!("✨ Build complete in {:.2}s", start.elapsed().as_secs_f64());
    println!("   Output: {}", ctx.layout.dist_dir.display());
    println!("   Fonts: {} in {} families", report.font_count(), report.families.len());
    if let Some(archive) = &report.archive {
        println!("   Archive: {}", archive.display());
    }
    println!("═══════════════════════════════════════════════════════════════════════════════");

    Ok(report)
}
