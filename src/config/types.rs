use serde::Deserialize;

/// Top-level configuration for a mirror run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mirror: MirrorConfig,
    pub output: OutputConfig,
}

/// What to mirror
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
    /// Crawl boundary: an absolute http(s) URL with a path ending in `/`
    /// and no query or fragment
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Entry pages, resolved against the base URL
    #[serde(default = "default_roots")]
    pub roots: Vec<String>,
}

/// Where and how to store the mirror
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Output directory (a git worktree unless skip-git is set)
    pub directory: String,

    /// Branch the workspace is switched to before the run
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Save redirected resources under the name they were first
    /// requested by
    #[serde(rename = "use-original-names", default)]
    pub use_original_names: bool,

    /// Skip all version-control interaction
    #[serde(rename = "skip-git", default)]
    pub skip_git: bool,

    /// When set, write the sorted list of written paths here
    #[serde(rename = "manifest-path", default)]
    pub manifest_path: Option<String>,
}

fn default_roots() -> Vec<String> {
    vec!["index.html".to_string()]
}

fn default_branch() -> String {
    "master".to_string()
}
