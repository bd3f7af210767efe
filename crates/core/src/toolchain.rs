//! Driving the Iosevka npm toolchain.

use std::path::Path;

use log::info;

use crate::{
    config::DIST_DIRNAME,
    error::{Error, Result},
    exec::{CommandRunner, ToolCommand, ToolOutput},
    io::remove_dir_if_exists,
};

/// Run a tool to completion; a spawn failure or non-zero exit is a
/// [`Error::BuildToolFailure`].
pub fn run_tool(runner: &dyn CommandRunner, command: ToolCommand) -> Result<ToolOutput> {
    let output = runner.run(&command).map_err(|e| Error::BuildToolFailure {
        command: command.to_string(),
        code: None,
        output: e.to_string(),
    })?;
    if !output.success() {
        return Err(Error::BuildToolFailure {
            command: command.to_string(),
            code: output.code,
            output: output.tail(),
        });
    }
    Ok(output)
}

/// `npm ci`, skipped when `node_modules` is present and the tree did not change.
pub fn install_dependencies(
    runner: &dyn CommandRunner,
    repo_dir: &Path,
    tree_changed: bool,
) -> Result<bool> {
    if !tree_changed && repo_dir.join("node_modules").is_dir() {
        println!("  Dependencies up to date");
        return Ok(false);
    }
    run_tool(runner, ToolCommand::new("npm").arg("ci").current_dir(repo_dir))?;
    Ok(true)
}

/// Remove the previous `dist/` and build every target.
pub fn build_fonts(runner: &dyn CommandRunner, repo_dir: &Path, targets: &[String]) -> Result<()> {
    if remove_dir_if_exists(repo_dir.join(DIST_DIRNAME))? {
        info!("Removed previous {DIST_DIRNAME}/");
    }
    println!("  Building {}", targets.join(" "));
    let command = ToolCommand::new("npm")
        .args(["run", "build", "--"])
        .args(targets)
        .current_dir(repo_dir);
    run_tool(runner, command)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::exec::fake::{FakeRunner, fail, ok};

    #[test]
    fn test_install_skipped_with_node_modules() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("node_modules")).unwrap();
        let runner = FakeRunner::forbidden();
        assert!(!install_dependencies(&runner, temp.path(), false).unwrap());
    }

    #[test]
    fn test_install_runs_after_checkout_change() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("node_modules")).unwrap();
        let runner = FakeRunner::new(|_| ok(""));
        assert!(install_dependencies(&runner, temp.path(), true).unwrap());
        assert_eq!(runner.calls(), ["npm ci"]);
    }

    #[test]
    fn test_build_removes_old_dist_and_passes_targets() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("dist/Old/TTF")).unwrap();
        let runner = FakeRunner::new(|_| ok(""));

        let targets = vec!["ttf::A".to_string(), "ttf::B".to_string()];
        build_fonts(&runner, temp.path(), &targets).unwrap();

        assert_eq!(runner.calls(), ["npm run build -- ttf::A ttf::B"]);
        assert!(!temp.path().join("dist").exists());
    }

    #[test]
    fn test_build_failure_carries_code_and_output() {
        let temp = tempdir().unwrap();
        let runner = FakeRunner::new(|_| fail(2, "Error: glyph not found"));

        let err = build_fonts(&runner, temp.path(), &["ttf::A".to_string()]).unwrap_err();
        match &err {
            Error::BuildToolFailure { code, output, .. } => {
                assert_eq!(*code, Some(2));
                assert!(output.contains("glyph not found"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("exited with status 2"));
    }

    #[test]
    fn test_unspawnable_tool() {
        let temp = tempdir().unwrap();
        let runner = FakeRunner::new(|_| Err(std::io::Error::other("npm: not found")));
        let err = install_dependencies(&runner, temp.path(), true).unwrap_err();
        assert!(matches!(err, Error::BuildToolFailure { code: None, .. }));
        assert_eq!(err.exit_code(), 4);
    }
}
