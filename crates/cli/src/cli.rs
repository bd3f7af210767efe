//! CLI definitions and command dispatch.

use std::{fs::write, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;

use iosevka_custom_core::{
    BuildConfiguration, Error, Layout, SystemRunner, build_from_file, clean,
    config::BUILD_PLANS_FILENAME,
};

#[derive(Parser)]
#[command(name = "iosevka-custom", version)]
#[command(about = "Build custom Iosevka fonts from a typed build plan")]
#[command(after_help = "Without a subcommand, runs the full build.\n\n\
    Exit codes: 2 source unavailable, 3 invalid configuration, 4 build tool \
    failure, 5 missing artifacts, 1 anything else.")]
pub struct Cli {
    /// Typed build configuration
    #[arg(long, global = true, default_value = BUILD_PLANS_FILENAME)]
    pub config: PathBuf,
    /// Directory holding the `repo/` checkout
    #[arg(long, global = true, default_value = ".")]
    pub work_dir: PathBuf,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Fetch the source, build every plan and package the results
    Build,
    /// Print the toolchain's private-build-plans.toml without building
    Render {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove the checkout and all build outputs
    Clean,
}

impl Cli {
    pub fn run(&self) -> ExitCode {
        self.execute().map_or_else(
            |e| {
                eprintln!("Error: {e:#}");
                ExitCode::from(exit_code(&e))
            },
            |_| ExitCode::SUCCESS,
        )
    }

    pub fn execute(&self) -> Result<()> {
        match self.command.clone().unwrap_or(Commands::Build) {
            Commands::Build => {
                build_from_file(&SystemRunner, &self.config, &self.work_dir)?;
            }
            Commands::Render { output } => {
                let rendered = BuildConfiguration::load(&self.config)?.render()?;
                match output {
                    Some(path) => {
                        write(&path, rendered)
                            .with_context(|| format!("Failed to write {}", path.display()))?;
                        debug!("Wrote {}", path.display());
                    }
                    None => print!("{rendered}"),
                }
            }
            Commands::Clean => {
                clean(&Layout::new(&self.work_dir).repo_dir)?;
            }
        }
        Ok(())
    }
}

/// Exit code for a failed command; pipeline failures map per phase.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    error.downcast_ref::<Error>().map_or(1, Error::exit_code)
}
