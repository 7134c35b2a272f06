//! Shortest-unique-prefix labels for long ids.

use std::collections::BTreeSet;

/// Labels never get shorter than this, even when a shorter prefix is unique.
pub const MIN_PREFIX_LEN: usize = 4;

/// Shortest prefix of `target`, at least [`MIN_PREFIX_LEN`] characters long,
/// that no other id in `pool` starts with. Falls back to the whole id.
pub fn collapse_id<I, S>(target: &str, pool: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    collapse_id_with_min(target, pool, MIN_PREFIX_LEN)
}

pub fn collapse_id_with_min<I, S>(target: &str, pool: I, min_len: usize) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let others = pool
        .into_iter()
        .filter(|id| id.as_ref() != target)
        .collect::<Vec<_>>();

    // Prefix lengths are counted in characters; slicing stays on char boundaries.
    let prefix_ends = target
        .char_indices()
        .map(|(start, ch)| start + ch.len_utf8())
        .skip(min_len.saturating_sub(1));
    for end in prefix_ends {
        let prefix = &target[..end];
        if others.iter().all(|other| !other.as_ref().starts_with(prefix)) {
            return prefix.to_string();
        }
    }
    target.to_string()
}

/// Resolves a collapsed label back to the id it stands for. An exact match
/// wins; otherwise exactly one id must start with `label`.
pub fn expand_prefix<'a, I>(label: &str, pool: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut unique = None;
    let mut ambiguous = false;
    for id in pool {
        if id == label {
            return Some(id);
        }
        if id.starts_with(label) {
            if unique.is_some_and(|previous| previous != id) {
                ambiguous = true;
            } else {
                unique = Some(id);
            }
        }
    }
    if ambiguous {
        None
    } else {
        unique
    }
}

/// Id pool gathered from several independent collections.
#[derive(Debug, Clone)]
pub struct IdCollapser {
    pool: BTreeSet<String>,
    min_len: usize,
}

impl Default for IdCollapser {
    fn default() -> Self {
        Self::new(MIN_PREFIX_LEN)
    }
}

impl IdCollapser {
    pub fn new(min_len: usize) -> Self {
        Self {
            pool: BTreeSet::new(),
            min_len,
        }
    }

    pub fn with_source<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extend(ids);
        self
    }

    pub fn extend<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pool.extend(ids.into_iter().map(Into::into));
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn collapse(&self, id: &str) -> String {
        collapse_id_with_min(id, &self.pool, self.min_len)
    }

    pub fn expand(&self, label: &str) -> Option<&str> {
        expand_prefix(label, self.pool.iter().map(String::as_str))
    }
}
