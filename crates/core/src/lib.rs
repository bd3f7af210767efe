//! Iosevka Custom Core - build orchestration for custom Iosevka fonts.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod exec;
pub mod io;
pub mod nerd;
pub mod options;
pub mod package;
pub mod pipeline;
pub mod plans;
pub mod source;
pub mod toolchain;
pub mod webfont;

pub use error::{Error, Result};
pub use exec::{CommandRunner, SystemRunner, ToolCommand, ToolOutput};
pub use options::{NerdFontOptions, OutputOptions};
pub use pipeline::{BuildReport, Layout, PipelineContext, build_all, build_from_file, clean};
pub use plans::{BuildConfiguration, BuildPlan, Ligations, Serifs, Spacing, VariantSet};
pub use source::{Acquired, DirtyPolicy, Reference, SourceSpec};
