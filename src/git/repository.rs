use crate::error::{GitShipError, Result};
use crate::git::{parse_remote_slug, records_to_json, History, LOG_FORMAT};
use git2::{Repository as Git2Repo, Sort};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Repository access that shells out to `git log` and reads the object
/// graph through git2
pub struct GitCli {
    repo: Git2Repo,
    workdir: PathBuf,
}

impl GitCli {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        let workdir = repo
            .workdir()
            .unwrap_or_else(|| repo.path())
            .to_path_buf();

        Ok(GitCli { repo, workdir })
    }

    /// Working directory of the repository
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// `(owner, name)` parsed from a remote's URL, if it has a recognisable one
    pub fn remote_slug(&self, remote: &str) -> Option<(String, String)> {
        let remote = self.repo.find_remote(remote).ok()?;
        remote.url().and_then(parse_remote_slug)
    }
}

impl History for GitCli {
    fn log_text(&self, range: Option<&str>) -> Result<String> {
        let pretty = format!("--pretty=format:{}", LOG_FORMAT);
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.workdir).args([
            "log",
            "--first-parent",
            "--no-color",
            "-z",
            pretty.as_str(),
        ]);
        if let Some(range) = range {
            cmd.arg(range);
        }

        debug!(workdir = %self.workdir.display(), ?range, "running git log");
        let output = cmd
            .output()
            .map_err(|e| GitShipError::git_command(format!("Failed to run git log: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitShipError::git_command(format!(
                "git log failed with exit code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        records_to_json(&String::from_utf8_lossy(&output.stdout))
    }

    fn first_commit(&self) -> Result<String> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;
        revwalk.simplify_first_parent()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;

        match revwalk.next() {
            Some(oid) => Ok(oid?.to_string()),
            None => Err(GitShipError::git_command("Repository has no commits")),
        }
    }
}
