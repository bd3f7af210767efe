//! Locating what the toolchain produced.

use std::path::{Path, PathBuf};

use crate::{
    config::{TTF_DIRNAME, UNHINTED_SUFFIX},
    error::{Error, Result},
    io::{file_name, glob_fonts, list_dirs, remove_dir_if_exists},
    plans::BuildPlan,
};

/// The hinted TTFs one plan produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyArtifacts {
    pub plan: String,
    pub dir: PathBuf,
    pub fonts: Vec<PathBuf>,
}

/// Every plan must have produced at least one `dist/<Plan>/TTF/*.ttf`.
pub fn collect(dist_dir: &Path, plans: &[BuildPlan]) -> Result<Vec<FamilyArtifacts>> {
    plans
        .iter()
        .map(|plan| {
            let dir = dist_dir.join(&plan.name);
            let ttf_dir = dir.join(TTF_DIRNAME);
            let fonts = if ttf_dir.is_dir() { glob_fonts(&ttf_dir)? } else { Vec::new() };
            if fonts.is_empty() {
                return Err(Error::ArtifactMissing { path: ttf_dir });
            }
            Ok(FamilyArtifacts { plan: plan.name.clone(), dir, fonts })
        })
        .collect()
}

/// Delete `dist/*/*-Unhinted` directories, returning what was removed.
pub fn prune_unhinted(dist_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for family in list_dirs(dist_dir)? {
        for dir in list_dirs(&family)? {
            if file_name(&dir)?.ends_with(UNHINTED_SUFFIX) && remove_dir_if_exists(&dir)? {
                removed.push(dir);
            }
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::plans::BuildConfiguration;

    fn plans() -> Vec<BuildPlan> {
        BuildConfiguration::parse("[plans.A]\nfamily = \"A\"\n[plans.B]\nfamily = \"B\"\n")
            .unwrap()
            .plans
    }

    #[test]
    fn test_collect_finds_every_plan() {
        let temp = tempdir().unwrap();
        for plan in ["A", "B"] {
            let ttf = temp.path().join(plan).join("TTF");
            fs::create_dir_all(&ttf).unwrap();
            fs::write(ttf.join(format!("{plan}-Regular.ttf")), b"").unwrap();
        }

        let families = collect(temp.path(), &plans()).unwrap();
        assert_eq!(families.len(), 2);
        assert_eq!(families[1].plan, "B");
        assert_eq!(families[1].fonts, [temp.path().join("B/TTF/B-Regular.ttf")]);
    }

    #[test]
    fn test_collect_under_work_dir_with_brackets() {
        let temp = tempdir().unwrap();
        let dist = temp.path().join("fonts[v2]/repo/dist");
        for plan in ["A", "B"] {
            let ttf = dist.join(plan).join("TTF");
            fs::create_dir_all(&ttf).unwrap();
            fs::write(ttf.join(format!("{plan}-Regular.ttf")), b"").unwrap();
        }

        let families = collect(&dist, &plans()).unwrap();
        assert_eq!(families[0].fonts, [dist.join("A/TTF/A-Regular.ttf")]);
    }

    #[test]
    fn test_missing_plan_output_is_reported() {
        let temp = tempdir().unwrap();
        let ttf = temp.path().join("A/TTF");
        fs::create_dir_all(&ttf).unwrap();
        fs::write(ttf.join("A-Regular.ttf"), b"").unwrap();
        fs::create_dir_all(temp.path().join("B/TTF")).unwrap();

        match collect(temp.path(), &plans()).unwrap_err() {
            Error::ArtifactMissing { path } => assert_eq!(path, temp.path().join("B/TTF")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_prune_unhinted() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("A/TTF")).unwrap();
        fs::create_dir_all(temp.path().join("A/TTF-Unhinted")).unwrap();
        fs::create_dir_all(temp.path().join("B/WOFF2-Unhinted")).unwrap();

        let removed = prune_unhinted(temp.path()).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(temp.path().join("A/TTF").is_dir());
        assert!(!temp.path().join("A/TTF-Unhinted").exists());
    }
}
