//! Crawl engine - the fetch loop
//!
//! Pulls pending links from the frontier one at a time, classifies each
//! response, stores fetched bytes under the output root, dispatches text
//! bodies to the scanner for their content type, and feeds discovered
//! links back to the frontier. One request is in flight at a time and a
//! response is fully processed - extraction and writes included - before
//! the next request is issued.

use crate::config::{parse_base_origin, Config};
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchOutcome};
use crate::crawler::frontier::{Frontier, PendingLink};
use crate::output::{git, store, Manifest};
use crate::scan;
use crate::MirrorError;
use reqwest::Client;
use std::path::Path;

/// Single-threaded crawl driver.
pub struct Engine {
    config: Config,
    client: Client,
    frontier: Frontier,
    manifest: Manifest,
}

impl Engine {
    /// Creates an engine with the frontier seeded from the configured
    /// roots.
    ///
    /// Fails when the base URL is invalid or a root resolves outside the
    /// base origin - configuration mistakes that must abort before any
    /// network activity.
    pub fn new(config: Config) -> Result<Self, MirrorError> {
        let base = parse_base_origin(&config.mirror.base_url)?;
        let client = build_http_client()?;
        let mut frontier = Frontier::new(base.clone());
        for root in &config.mirror.roots {
            let resolved = base.join(root)?;
            if !frontier.add_link(resolved, None) {
                return Err(MirrorError::RootOutsideOrigin {
                    root: root.clone(),
                    base: base.to_string(),
                });
            }
        }
        Ok(Self {
            config,
            client,
            frontier,
            manifest: Manifest::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Runs the fetch loop until the frontier is empty.
    ///
    /// Per-resource failures are logged and skipped; only filesystem
    /// errors under the output root abort the run.
    pub async fn run(&mut self) -> Result<(), MirrorError> {
        let started = std::time::Instant::now();
        while let Some(link) = self.frontier.next() {
            self.process(link).await?;
        }
        tracing::info!(
            "mirror complete: {} resources stored in {:.1?}",
            self.manifest.len(),
            started.elapsed()
        );
        Ok(())
    }

    async fn process(&mut self, mut link: PendingLink) -> Result<(), MirrorError> {
        let outcome = fetch_url(&self.client, &link.url).await;
        match outcome {
            FetchOutcome::Redirect { location } => {
                let target = match link.url.join(&location) {
                    Ok(target) => target,
                    Err(e) => {
                        tracing::warn!(
                            "unresolvable Location \"{}\" from {}: {}",
                            location,
                            link.url,
                            e
                        );
                        return Ok(());
                    }
                };
                tracing::info!("redirect: {} -> {}", link.url, target);
                // Thread the chain's first link through, so the final
                // resource can be saved under the name it was first
                // requested by. Loops self-terminate via the seen set.
                let first = link.original.take().map(|boxed| *boxed).unwrap_or(link);
                self.frontier.add_link(target, Some(first));
            }
            FetchOutcome::Success { content_type, body } => {
                self.store_and_scan(&link, content_type.as_deref(), &body)
                    .await?;
            }
            FetchOutcome::Failed { detail } => {
                tracing::warn!("bad response fetching {}: {}", link.url, detail);
            }
        }
        Ok(())
    }

    async fn store_and_scan(
        &mut self,
        link: &PendingLink,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<(), MirrorError> {
        tracing::info!("{}\t{}", content_type.unwrap_or("-"), link.url);

        let name = if self.config.output.use_original_names {
            link.original_path().to_owned()
        } else {
            link.path.clone()
        };
        self.manifest.push(name.clone());
        store::write_resource(Path::new(&self.config.output.directory), &name, body).await?;

        let Some(content_type) = content_type else {
            tracing::warn!("no content type specified for {}", link.url);
            return Ok(());
        };
        // TODO: honor the charset parameter instead of assuming UTF-8
        let text = String::from_utf8_lossy(body);
        let Some(found) = scan::scan_links(content_type, &link.url, &text) else {
            return Ok(());
        };
        tracing::debug!("{} candidate references in {}", found.len(), link.url);
        for url in found {
            self.frontier.add_link(url, None);
        }
        Ok(())
    }
}

/// Runs a complete mirror: seed the frontier, verify and reset the
/// workspace, crawl, persist the manifest, commit.
///
/// The crawl runs fully before the commit step; when the commit then
/// fails, the written output is left on disk uncommitted.
pub async fn mirror(config: Config) -> Result<(), MirrorError> {
    let mut engine = Engine::new(config)?;
    let directory = engine.config().output.directory.clone();
    let output_dir = Path::new(&directory);

    if engine.config().output.skip_git {
        tokio::fs::create_dir_all(output_dir).await?;
    } else {
        git::ensure_clean(output_dir).await?;
        git::checkout(output_dir, &engine.config().output.branch).await?;
        git::ensure_clean(output_dir).await?;
        git::remove_tracked(output_dir).await?;
    }

    engine.run().await?;

    if let Some(manifest_path) = engine.config().output.manifest_path.clone() {
        engine.manifest().write(Path::new(&manifest_path)).await?;
        tracing::info!("manifest written to {}", manifest_path);
    }

    if !engine.config().output.skip_git {
        git::commit_all(output_dir, "Automatic sync by sitefold").await?;
    }
    Ok(())
}
