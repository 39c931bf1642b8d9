//! Stable descending-priority ordering of handlers.

/// An ordered list of items, highest priority first.
///
/// Items with equal priority keep their insertion order, so visiting order is
/// deterministic for a fixed sequence of insertions.
///
/// # Example
///
/// ```
/// # use overdraw::render::PriorityChain;
/// let mut chain = PriorityChain::new();
/// chain.insert(1000, "plugin");
/// chain.insert(1, "host");
/// chain.insert(1500, "script");
/// chain.insert(1000, "late plugin");
///
/// let order: Vec<_> = chain.iter().map(|(_, item)| *item).collect();
/// assert_eq!(order, vec!["script", "plugin", "late plugin", "host"]);
/// ```
#[derive(Debug, Clone)]
pub struct PriorityChain<T> {
    entries: Vec<(i32, T)>,
}

impl<T> PriorityChain<T> {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts `item` after every entry whose priority is at least `priority`.
    pub fn insert(&mut self, priority: i32, item: T) {
        let index = self
            .entries
            .partition_point(|(existing, _)| *existing >= priority);
        self.entries.insert(index, (priority, item));
    }

    /// Iterates entries in visiting order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &T)> {
        self.entries.iter().map(|(priority, item)| (*priority, item))
    }

    /// Visits entries in order and returns the first `Some` produced by `f`.
    /// Later entries are not visited.
    pub fn find_map<R>(&self, mut f: impl FnMut(i32, &T) -> Option<R>) -> Option<R> {
        self.iter().find_map(|(priority, item)| f(priority, item))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the chain has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for PriorityChain<T> {
    fn default() -> Self {
        Self::new()
    }
}
