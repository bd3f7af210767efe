//! Configuration constants for Iosevka builds.

/// Upstream Iosevka repository.
pub const IOSEVKA_REPO_URL: &str = "https://github.com/be5invis/Iosevka.git";

/// Branch tracked when the configuration names no reference.
pub const IOSEVKA_DEFAULT_BRANCH: &str = "main";

/// Clone depth used for fresh checkouts and updates.
pub const DEFAULT_CLONE_DEPTH: u32 = 1;

/// Typed build configuration read from the working directory.
pub const BUILD_PLANS_FILENAME: &str = "build-plans.toml";

/// Checkout directory, relative to the working directory.
pub const REPO_DIRNAME: &str = "repo";

/// Toolchain output directory, relative to the checkout.
pub const DIST_DIRNAME: &str = "dist";

/// Rendered configuration the toolchain picks up, relative to the checkout.
pub const RENDERED_PLANS_FILENAME: &str = "private-build-plans.toml";

/// Build target prefix passed to `npm run build`.
pub const TTF_TARGET_PREFIX: &str = "ttf::";

/// Hinted TTF directory inside each family.
pub const TTF_DIRNAME: &str = "TTF";

/// Suffix of unhinted output directories.
pub const UNHINTED_SUFFIX: &str = "-Unhinted";

/// WOFF2 directory inside each family.
pub const WOFF2_DIRNAME: &str = "WOFF2";

/// Suffix of patched Nerd Font families.
pub const NERD_FONT_SUFFIX: &str = "-NerdFont";

/// Docker image of the Nerd Fonts patcher.
pub const NERD_FONT_IMAGE: &str = "nerdfonts/patcher";

/// Patcher flags: all glyph sets, box drawing, line height adjustment.
pub const NERD_FONT_FLAGS: &[&str] = &["--complete", "--boxdrawing", "--adjust-line-height"];

/// Archive holding every family's collection.
pub const ALL_TTC_ARCHIVE: &str = "all-ttc.zip";

/// Script subsets smaller than this many codepoints are not emitted.
pub const MIN_CHARS_FOR_SUBSET: usize = 8;

/// Lines of captured tool output kept in failure reports.
pub const OUTPUT_TAIL_LINES: usize = 40;
