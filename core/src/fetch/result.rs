use std::fmt;

/// Counts of what a single payload application changed.
///
/// `commits`, `trees`, and `blobs` count objects actually inserted;
/// `branches` counts advertised branch heads examined, whether or not the
/// corresponding remote-tracking ref moved.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FetchResult {
    commits: usize,
    trees: usize,
    blobs: usize,
    branches: usize,
}

impl FetchResult {
    pub fn new() -> FetchResult {
        FetchResult::default()
    }

    pub fn add_commit(&mut self) {
        self.commits += 1;
    }

    pub fn add_tree(&mut self) {
        self.trees += 1;
    }

    pub fn add_blob(&mut self) {
        self.blobs += 1;
    }

    pub fn add_branch(&mut self) {
        self.branches += 1;
    }

    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn trees(&self) -> usize {
        self.trees
    }

    pub fn blobs(&self) -> usize {
        self.blobs
    }

    pub fn branches(&self) -> usize {
        self.branches
    }

    /// Returns true if nothing was inserted or examined.
    pub fn is_empty(&self) -> bool {
        *self == FetchResult::default()
    }
}

impl fmt::Display for FetchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} commits, {} trees, {} blobs, {} branches",
            self.commits, self.trees, self.blobs, self.branches
        )
    }
}

#[cfg(test)]
mod tests {
    use super::FetchResult;

    #[test]
    fn counters_are_independent() {
        let mut r = FetchResult::new();
        assert!(r.is_empty());

        r.add_commit();
        r.add_commit();
        r.add_tree();
        r.add_blob();
        r.add_blob();
        r.add_blob();
        r.add_branch();

        assert_eq!(r.commits(), 2);
        assert_eq!(r.trees(), 1);
        assert_eq!(r.blobs(), 3);
        assert_eq!(r.branches(), 1);
        assert!(!r.is_empty());
    }

    #[test]
    fn display() {
        let mut r = FetchResult::new();
        r.add_commit();
        r.add_branch();
        assert_eq!(r.to_string(), "1 commits, 0 trees, 0 blobs, 1 branches");
    }
}
