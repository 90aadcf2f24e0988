//! Crawl frontier - dedup set and pending-work queue
//!
//! The frontier owns the mapping from candidate URLs to relative output
//! paths and guarantees exactly-once-enqueue semantics: however many
//! documents reference a path, and however many redirects lead to it, it
//! is queued at most once per run.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A queued, deduplicated unit of crawl work.
#[derive(Debug, Clone)]
pub struct PendingLink {
    /// Absolute URL, query and fragment stripped.
    pub url: Url,
    /// URL path relative to the base origin.
    pub path: String,
    /// First link of the redirect chain that led here, when one did. One
    /// hop only: the chain collapses to its first link as it is threaded.
    pub original: Option<Box<PendingLink>>,
}

impl PendingLink {
    /// The path this resource was first requested by, falling back to its
    /// own path when no redirect preceded it.
    pub fn original_path(&self) -> &str {
        self.original
            .as_deref()
            .map(|link| link.path.as_str())
            .unwrap_or(&self.path)
    }
}

/// Dedup set plus FIFO work queue, bounded by a base origin.
pub struct Frontier {
    base: Url,
    seen: HashSet<String>,
    queue: VecDeque<PendingLink>,
}

impl Frontier {
    /// Creates a frontier bounded by `base` (an absolute http(s) URL with a
    /// path ending in `/` and no query or fragment).
    pub fn new(base: Url) -> Self {
        Self {
            base,
            seen: HashSet::new(),
            queue: VecDeque::new(),
        }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Offers a candidate URL to the frontier.
    ///
    /// Strips query and fragment, then maps the URL to a path relative to
    /// the base origin. Returns `false` when the URL lies outside the
    /// origin (different scheme, credentials, host, or port, or a path not
    /// under the base path). Returns `true` for in-origin URLs whether or
    /// not new work was queued: a path that was already seen is not queued
    /// again.
    pub fn add_link(&mut self, mut url: Url, original: Option<PendingLink>) -> bool {
        url.set_query(None);
        url.set_fragment(None);
        let Some(path) = self.relative_path(&url) else {
            return false;
        };
        if !self.seen.insert(path.clone()) {
            return true;
        }
        self.queue.push_back(PendingLink {
            url,
            path,
            original: original.map(Box::new),
        });
        true
    }

    /// Next unit of work, in enqueue order.
    pub fn next(&mut self) -> Option<PendingLink> {
        self.queue.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// The URL's path relative to the base origin, or `None` when the URL
    /// is out of scope.
    fn relative_path(&self, url: &Url) -> Option<String> {
        if url.scheme() != self.base.scheme() {
            return None;
        }
        if url.username() != self.base.username() {
            return None;
        }
        if url.password() != self.base.password() {
            return None;
        }
        if url.host_str() != self.base.host_str() {
            return None;
        }
        if url.port() != self.base.port() {
            return None;
        }
        url.path().strip_prefix(self.base.path()).map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontier() -> Frontier {
        Frontier::new(Url::parse("https://example.net/site/").unwrap())
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn accepts_links_under_base() {
        let mut f = frontier();
        assert!(f.add_link(url("https://example.net/site/a.html"), None));
        let link = f.next().unwrap();
        assert_eq!(link.path, "a.html");
        assert_eq!(link.url.as_str(), "https://example.net/site/a.html");
    }

    #[test]
    fn computes_nested_relative_paths() {
        let mut f = frontier();
        assert!(f.add_link(url("https://example.net/site/img/deep/x.png"), None));
        assert_eq!(f.next().unwrap().path, "img/deep/x.png");
    }

    #[test]
    fn rejects_different_host() {
        let mut f = frontier();
        assert!(!f.add_link(url("https://other.net/site/a.html"), None));
        assert_eq!(f.pending(), 0);
    }

    #[test]
    fn rejects_different_scheme() {
        let mut f = frontier();
        assert!(!f.add_link(url("http://example.net/site/a.html"), None));
    }

    #[test]
    fn rejects_different_port() {
        let mut f = frontier();
        assert!(!f.add_link(url("https://example.net:8443/site/a.html"), None));
    }

    #[test]
    fn rejects_credentials_mismatch() {
        let mut f = frontier();
        assert!(!f.add_link(url("https://user@example.net/site/a.html"), None));
    }

    #[test]
    fn rejects_path_outside_base() {
        let mut f = frontier();
        assert!(!f.add_link(url("https://example.net/elsewhere/a.html"), None));
        assert!(!f.add_link(url("https://example.net/"), None));
    }

    #[test]
    fn strips_query_and_fragment() {
        let mut f = frontier();
        assert!(f.add_link(url("https://example.net/site/a.html?v=1#top"), None));
        let link = f.next().unwrap();
        assert_eq!(link.path, "a.html");
        assert_eq!(link.url.as_str(), "https://example.net/site/a.html");
    }

    #[test]
    fn enqueue_is_idempotent() {
        let mut f = frontier();
        assert!(f.add_link(url("https://example.net/site/a.html"), None));
        assert!(f.add_link(url("https://example.net/site/a.html?q=2"), None));
        assert!(f.add_link(url("https://example.net/site/a.html#frag"), None));
        assert_eq!(f.pending(), 1);
        assert_eq!(f.seen_count(), 1);
    }

    #[test]
    fn seen_paths_stay_seen_after_dequeue() {
        let mut f = frontier();
        f.add_link(url("https://example.net/site/a.html"), None);
        f.next().unwrap();
        assert!(f.add_link(url("https://example.net/site/a.html"), None));
        assert_eq!(f.pending(), 0);
        assert_eq!(f.seen_count(), 1);
    }

    #[test]
    fn fifo_order() {
        let mut f = frontier();
        f.add_link(url("https://example.net/site/1"), None);
        f.add_link(url("https://example.net/site/2"), None);
        f.add_link(url("https://example.net/site/3"), None);
        assert_eq!(f.next().unwrap().path, "1");
        assert_eq!(f.next().unwrap().path, "2");
        assert_eq!(f.next().unwrap().path, "3");
    }

    #[test]
    fn original_path_falls_back_to_own_path() {
        let mut f = frontier();
        f.add_link(url("https://example.net/site/new.html"), None);
        let plain = f.next().unwrap();
        assert_eq!(plain.original_path(), "new.html");

        f.add_link(url("https://example.net/site/moved.html"), Some(plain));
        let threaded = f.next().unwrap();
        assert_eq!(threaded.path, "moved.html");
        assert_eq!(threaded.original_path(), "new.html");
    }
}
