//! Acquiring the upstream Iosevka checkout.
//!
//! A fresh checkout is created with `git init` + a shallow `fetch` of the
//! wanted reference, so branches, tags and commits all follow the same path.
//! An existing checkout is only fetched when it cannot be shown to already
//! match the reference.

use std::{fmt, path::Path};

use log::{info, warn};
use serde::Deserialize;

use crate::{
    config::{DEFAULT_CLONE_DEPTH, IOSEVKA_DEFAULT_BRANCH, IOSEVKA_REPO_URL},
    error::{Error, Result},
    exec::{CommandRunner, ToolCommand, ToolOutput},
    io::{ensure_dir, remove_dir_if_exists},
};

/// Where the toolchain source comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SourceSpec {
    pub url: String,
    pub reference: Reference,
    /// History depth to fetch; 0 fetches everything.
    pub depth: u32,
    pub dirty: DirtyPolicy,
}

impl Default for SourceSpec {
    fn default() -> Self {
        Self {
            url: IOSEVKA_REPO_URL.to_string(),
            reference: Reference::default(),
            depth: DEFAULT_CLONE_DEPTH,
            dirty: DirtyPolicy::default(),
        }
    }
}

impl SourceSpec {
    /// Problems that make this source unusable, as human readable messages.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.url.trim().is_empty() {
            problems.push("source.url must not be empty".to_string());
        }
        match &self.reference {
            Reference::Branch(name) | Reference::Tag(name) if name.trim().is_empty() => {
                problems.push("source.reference must name a branch or tag".to_string());
            }
            Reference::Commit(sha)
                if sha.len() != 40 || !sha.bytes().all(|b| b.is_ascii_hexdigit()) =>
            {
                problems
                    .push(format!("source.reference commit {sha:?} is not a full 40-digit SHA"));
            }
            _ => {}
        }
        problems
    }
}

/// The revision of the upstream repository to build from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reference {
    Branch(String),
    Tag(String),
    Commit(String),
}

impl Default for Reference {
    fn default() -> Self {
        Reference::Branch(IOSEVKA_DEFAULT_BRANCH.to_string())
    }
}

impl Reference {
    /// Refspec handed to `git fetch`.
    fn refspec(&self) -> String {
        match self {
            Reference::Branch(name) => format!("refs/heads/{name}"),
            Reference::Tag(name) => format!("refs/tags/{name}"),
            Reference::Commit(sha) => sha.to_lowercase(),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Branch(name) => write!(f, "branch {name}"),
            Reference::Tag(name) => write!(f, "tag {name}"),
            Reference::Commit(sha) => write!(f, "commit {sha}"),
        }
    }
}

/// What to do with tracked modifications in an existing checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirtyPolicy {
    /// Discard them with a hard reset.
    #[default]
    Reset,
    /// Refuse to build.
    Fail,
}

/// How the checkout was brought to the wanted reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquired {
    Cloned { head: String },
    Updated { from: String, to: String },
    UpToDate { head: String },
    /// The remote could not be reached; the existing checkout is used as is.
    Offline { head: String },
}

impl Acquired {
    pub fn head(&self) -> &str {
        match self {
            Acquired::Cloned { head }
            | Acquired::UpToDate { head }
            | Acquired::Offline { head } => head,
            Acquired::Updated { to, .. } => to,
        }
    }

    /// True when the working tree now differs from before acquisition.
    pub fn changed(&self) -> bool {
        matches!(self, Acquired::Cloned { .. } | Acquired::Updated { .. })
    }
}

impl fmt::Display for Acquired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Acquired::Cloned { head } => write!(f, "cloned at {}", short(head)),
            Acquired::Updated { from, to } => write!(f, "updated {}..{}", short(from), short(to)),
            Acquired::UpToDate { head } => write!(f, "up to date at {}", short(head)),
            Acquired::Offline { head } => write!(f, "offline, using {}", short(head)),
        }
    }
}

fn short(sha: &str) -> &str {
    sha.get(..12).unwrap_or(sha)
}

/// Ensure `dir` holds a checkout of `spec`.
pub fn acquire(runner: &dyn CommandRunner, spec: &SourceSpec, dir: &Path) -> Result<Acquired> {
    let checkout = Checkout { runner, spec, dir };
    if dir.join(".git").exists() {
        let command = checkout.git(&["rev-parse", "HEAD"]);
        let output = runner
            .run(&command)
            .map_err(|e| checkout.unavailable(format!("`{command}` could not be run: {e}")))?;
        if output.success() {
            return checkout.update(output.first_line().to_string());
        }
        warn!("Existing checkout {} is unusable, cloning again:\n{}", dir.display(), output.tail());
    }
    checkout.clone_fresh()
}

struct Checkout<'a> {
    runner: &'a dyn CommandRunner,
    spec: &'a SourceSpec,
    dir: &'a Path,
}

impl Checkout<'_> {
    fn git(&self, args: &[&str]) -> ToolCommand {
        ToolCommand::new("git").arg("-C").arg(self.dir).args(args).quiet()
    }

    fn unavailable(&self, reason: impl Into<String>) -> Error {
        Error::SourceUnavailable { url: self.spec.url.clone(), reason: reason.into() }
    }

    /// Run a git command; any failure is reported against the source.
    fn require(&self, command: ToolCommand) -> Result<ToolOutput> {
        let output = self
            .runner
            .run(&command)
            .map_err(|e| self.unavailable(format!("`{command}` could not be run: {e}")))?;
        if !output.success() {
            return Err(self.unavailable(format!("`{command}` failed:\n{}", output.tail())));
        }
        Ok(output)
    }

    /// Run a git command that is allowed to fail.
    fn try_git(&self, args: &[&str]) -> Option<ToolOutput> {
        self.runner.run(&self.git(args)).ok().filter(ToolOutput::success)
    }

    fn head(&self) -> Result<String> {
        let output = self.require(self.git(&["rev-parse", "HEAD"]))?;
        Ok(output.first_line().to_string())
    }

    fn fetch(&self) -> Result<ToolOutput> {
        let mut command =
            ToolCommand::new("git").arg("-C").arg(self.dir).args(["fetch", "--no-tags"]);
        if self.spec.depth > 0 {
            command = command.arg(format!("--depth={}", self.spec.depth));
        }
        self.require(command.args(["origin", &self.spec.reference.refspec()]))
    }

    fn reset(&self, target: &str) -> Result<()> {
        self.require(self.git(&["reset", "--hard", "--quiet", target]))?;
        Ok(())
    }

    fn clone_fresh(&self) -> Result<Acquired> {
        if remove_dir_if_exists(self.dir)? {
            warn!("Removed incomplete checkout {}", self.dir.display());
        }
        ensure_dir(self.dir)?;
        info!("Fetching {} ({})", self.spec.url, self.spec.reference);

        let fetched = self
            .require(self.git(&["init", "--quiet"]))
            .and_then(|_| self.require(self.git(&["remote", "add", "origin", &self.spec.url])))
            .and_then(|_| self.fetch())
            .and_then(|_| self.reset("FETCH_HEAD"))
            .and_then(|_| self.head());

        match fetched {
            Ok(head) => Ok(Acquired::Cloned { head }),
            Err(e) => {
                if let Err(cleanup) = remove_dir_if_exists(self.dir) {
                    warn!("Could not remove partial checkout: {cleanup}");
                }
                Err(e)
            }
        }
    }

    fn update(&self, head: String) -> Result<Acquired> {
        self.ensure_remote_url()?;

        let changes = self.local_changes()?;
        let dirty = !changes.is_empty();
        if dirty {
            match self.spec.dirty {
                DirtyPolicy::Fail => {
                    return Err(Error::DirtyCheckout { path: self.dir.to_path_buf(), changes });
                }
                DirtyPolicy::Reset => warn!(
                    "Discarding {} local modification(s) in {}",
                    changes.len(),
                    self.dir.display()
                ),
            }
        }

        match self.wanted_commit() {
            Ok(Some(target)) if head.eq_ignore_ascii_case(&target) => {
                if dirty {
                    self.reset("HEAD")?;
                }
                return Ok(Acquired::UpToDate { head });
            }
            Ok(_) => {}
            Err(reason) => return self.offline(head, dirty, &reason),
        }

        if let Err(e) = self.fetch() {
            return self.offline(head, dirty, &e.to_string());
        }
        self.reset("FETCH_HEAD")?;
        let new_head = self.head()?;
        if new_head == head {
            Ok(Acquired::UpToDate { head })
        } else {
            Ok(Acquired::Updated { from: head, to: new_head })
        }
    }

    fn offline(&self, head: String, dirty: bool, reason: &str) -> Result<Acquired> {
        warn!("Remote {} unreachable, building from local checkout: {reason}", self.spec.url);
        if dirty {
            self.reset("HEAD")?;
        }
        Ok(Acquired::Offline { head })
    }

    fn ensure_remote_url(&self) -> Result<()> {
        let current = self.try_git(&["remote", "get-url", "origin"]);
        match current {
            Some(output) if output.first_line() == self.spec.url => Ok(()),
            Some(_) => {
                info!("Pointing origin at {}", self.spec.url);
                self.require(self.git(&["remote", "set-url", "origin", &self.spec.url]))?;
                Ok(())
            }
            None => {
                self.require(self.git(&["remote", "add", "origin", &self.spec.url]))?;
                Ok(())
            }
        }
    }

    /// Tracked files with uncommitted modifications.
    fn local_changes(&self) -> Result<Vec<String>> {
        let output = self.require(self.git(&["status", "--porcelain", "--untracked-files=no"]))?;
        Ok(output.stdout.lines().filter(|l| !l.trim().is_empty()).map(str::to_string).collect())
    }

    /// The commit the reference points at, when it can be known without
    /// fetching. `Err` means the remote could not be queried.
    fn wanted_commit(&self) -> std::result::Result<Option<String>, String> {
        match &self.spec.reference {
            Reference::Commit(sha) => Ok(Some(sha.to_lowercase())),
            // Annotated tags are listed twice; the peeled `^{}` entry is the commit.
            Reference::Tag(name) => {
                let tag = format!("refs/tags/{name}");
                let peeled = format!("{tag}^{{}}");
                let refs = self.remote_refs(&[tag.as_str(), peeled.as_str()])?;
                Ok(find_ref(&refs, &peeled).or_else(|| find_ref(&refs, &tag)))
            }
            Reference::Branch(name) => {
                let branch = format!("refs/heads/{name}");
                let refs = self.remote_refs(&[branch.as_str()])?;
                Ok(find_ref(&refs, &branch))
            }
        }
    }

    /// `git ls-remote` output for the given refs; queries the remote
    /// without transferring objects.
    fn remote_refs(&self, refs: &[&str]) -> std::result::Result<String, String> {
        let mut args = vec!["ls-remote", "origin"];
        args.extend_from_slice(refs);
        let command = self.git(&args);
        let output = self
            .runner
            .run(&command)
            .map_err(|e| format!("`{command}` could not be run: {e}"))?;
        if !output.success() {
            return Err(output.tail());
        }
        Ok(output.stdout)
    }
}

fn find_ref(listing: &str, refname: &str) -> Option<String> {
    listing.lines().find_map(|line| {
        let (sha, name) = line.split_once(char::is_whitespace)?;
        (name.trim() == refname).then(|| sha.to_string())
    })
}
