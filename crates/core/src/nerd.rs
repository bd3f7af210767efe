//! Nerd Font patching through the patcher's docker image.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::{NERD_FONT_SUFFIX, TTF_DIRNAME},
    error::{Error, Result},
    exec::{CommandRunner, ToolCommand},
    io::{ensure_dir, file_name, list_dirs},
    options::NerdFontOptions,
    toolchain::run_tool,
};

/// Patch every family under `dist_dir` into a sibling `<Family>-NerdFont`.
pub fn patch_all(
    runner: &dyn CommandRunner,
    dist_dir: &Path,
    options: &NerdFontOptions,
) -> Result<Vec<PathBuf>> {
    let mut patched = Vec::new();
    for family in list_dirs(dist_dir)? {
        let name = file_name(&family)?;
        let ttf_dir = family.join(TTF_DIRNAME);
        if name.ends_with(NERD_FONT_SUFFIX) || !ttf_dir.is_dir() {
            continue;
        }

        let out_dir = dist_dir.join(format!("{name}{NERD_FONT_SUFFIX}")).join(TTF_DIRNAME);
        ensure_dir(&out_dir)?;
        println!("  Patching {name}");
        run_tool(runner, patch_command(&absolute(&ttf_dir)?, &absolute(&out_dir)?, options))?;
        patched.push(out_dir);
    }
    Ok(patched)
}

fn patch_command(input: &Path, output: &Path, options: &NerdFontOptions) -> ToolCommand {
    ToolCommand::new("docker")
        .args(["run", "--rm", "-v"])
        .arg(volume(input, "/in"))
        .arg("-v")
        .arg(volume(output, "/out"))
        .arg(&options.image)
        .args(&options.flags)
}

fn volume(host: &Path, container: &str) -> String {
    format!("{}:{container}:Z", host.display())
}

/// Docker bind mounts need absolute host paths.
fn absolute(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|e| Error::io("resolve", path, e))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::exec::fake::{FakeRunner, fail, ok};

    #[test]
    fn test_patches_each_plain_family_once() {
        let temp = tempdir().unwrap();
        let dist = temp.path();
        fs::create_dir_all(dist.join("Iosevka/TTF")).unwrap();
        fs::create_dir_all(dist.join("Iosevka-NerdFont/TTF")).unwrap();
        fs::create_dir_all(dist.join("Empty")).unwrap();
        let runner = FakeRunner::new(|_| ok(""));

        let patched = patch_all(&runner, dist, &NerdFontOptions::default()).unwrap();

        assert_eq!(patched, [dist.join("Iosevka-NerdFont/TTF")]);
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("docker run --rm -v "));
        assert!(calls[0].contains("/Iosevka/TTF:/in:Z"));
        assert!(calls[0].contains("/Iosevka-NerdFont/TTF:/out:Z"));
        assert!(
            calls[0].ends_with("nerdfonts/patcher --complete --boxdrawing --adjust-line-height")
        );
    }

    #[test]
    fn test_patcher_failure_aborts() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("Iosevka/TTF")).unwrap();
        let runner = FakeRunner::new(|_| fail(125, "Unable to find image"));

        let err = patch_all(&runner, temp.path(), &NerdFontOptions::default()).unwrap_err();
        assert!(matches!(err, Error::BuildToolFailure { code: Some(125), .. }));
    }
}
