//! Version-control collaborator
//!
//! The output directory is a git worktree rewritten in full on every run:
//! prove it clean, switch to the configured branch, remove everything
//! tracked, then (after the crawl) stage and commit. Any precondition or
//! command failure is fatal. Commands that print to stderr are treated as
//! failed even on a zero exit.

use crate::GitError;
use std::path::Path;
use std::process::Output;
use tokio::process::Command;

async fn run_git(dir: &Path, args: &[&str]) -> Result<Output, GitError> {
    Ok(Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .await?)
}

fn command_error(action: &str, output: &Output) -> GitError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    GitError::Command {
        action: action.to_string(),
        detail: stderr.trim().to_string(),
    }
}

/// The workspace must report no tracked changes and no untracked files.
pub async fn ensure_clean(dir: &Path) -> Result<(), GitError> {
    let output = run_git(dir, &["status", "--porcelain", "--untracked-files=all"]).await?;
    if !output.status.success() {
        return Err(command_error("check repository status", &output));
    }
    if !output.stdout.is_empty() || !output.stderr.is_empty() {
        return Err(GitError::DirtyWorkspace);
    }
    Ok(())
}

pub async fn checkout(dir: &Path, branch: &str) -> Result<(), GitError> {
    let output = run_git(dir, &["checkout", "--quiet", branch]).await?;
    if !output.status.success() || !output.stderr.is_empty() {
        return Err(command_error("checkout target branch", &output));
    }
    Ok(())
}

/// Removes every tracked file, so resources gone upstream disappear from
/// the mirror too.
pub async fn remove_tracked(dir: &Path) -> Result<(), GitError> {
    let output = run_git(dir, &["rm", "-r", "--quiet", "--ignore-unmatch", "."]).await?;
    if !output.status.success() || !output.stderr.is_empty() {
        return Err(command_error("delete files in repository", &output));
    }
    Ok(())
}

/// Stages all changes and commits. The commit must succeed with no changes
/// as well, so every run leaves a snapshot.
pub async fn commit_all(dir: &Path, message: &str) -> Result<(), GitError> {
    let output = run_git(dir, &["add", "--all"]).await?;
    if !output.status.success() || !output.stderr.is_empty() {
        return Err(command_error("add updated files to the git index", &output));
    }

    let output = run_git(dir, &["commit", "--all", "--allow-empty", "--message", message]).await?;
    if !output.status.success() || !output.stderr.is_empty() {
        return Err(command_error("commit", &output));
    }
    tracing::info!("git commit succeeded");
    tracing::debug!("{}", String::from_utf8_lossy(&output.stdout).trim());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    async fn init_repo(dir: &Path) {
        let output = Command::new("git")
            .args(["init", "--quiet"])
            .current_dir(dir)
            .output()
            .await
            .unwrap();
        assert!(output.status.success());
    }

    #[tokio::test]
    async fn fresh_repository_is_clean() {
        if !git_available().await {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path()).await;
        ensure_clean(dir.path()).await.unwrap();
    }

    #[tokio::test]
    async fn untracked_file_makes_workspace_dirty() {
        if !git_available().await {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path()).await;
        std::fs::write(dir.path().join("stray.txt"), "x").unwrap();
        assert!(matches!(
            ensure_clean(dir.path()).await,
            Err(GitError::DirtyWorkspace)
        ));
    }

    #[tokio::test]
    async fn status_outside_a_repository_fails() {
        if !git_available().await {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ensure_clean(dir.path()).await,
            Err(GitError::Command { .. })
        ));
    }
}
