use std::collections::{HashSet, VecDeque};

use url::Url;

/// Reduces user input to a bare host name.
///
/// Accepts `example.com`, `https://Example.com/path` or `example.com:8080/x`.
/// Returns `None` for input with no usable host.
pub fn normalize_domain(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let host = Url::parse(&with_scheme).ok()?.host_str()?.to_lowercase();
    let host = host.trim_end_matches('.').to_string();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Deduplicating queue of domains waiting to be checked.
pub struct TargetManager {
    queue: VecDeque<String>,
    seen: HashSet<String>,
}

impl TargetManager {
    /// Creates a new, empty `TargetManager`.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            seen: HashSet::new(),
        }
    }

    /// Normalizes and queues a domain. Returns false when the input is
    /// unusable or already queued.
    pub fn add_target(&mut self, target: &str) -> bool {
        match normalize_domain(target) {
            Some(domain) if self.seen.insert(domain.clone()) => {
                self.queue.push_back(domain);
                true
            }
            _ => false,
        }
    }

    /// Returns the next pending domain, or `None` if the queue is empty.
    pub fn next(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Number of domains still queued.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is left to check.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for TargetManager {
    fn default() -> Self {
        Self::new()
    }
}
