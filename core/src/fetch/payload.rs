use std::collections::BTreeMap;

use crate::object::{RevBlob, RevCommit, RevTree};
use crate::refs::Ref;

/// A bundle of objects and branch heads received from a peer.
///
/// The order of the commit, tree, and blob lists is preserved when the
/// payload is applied, but carries no meaning beyond that: no topological
/// sorting is done. Branch heads are keyed by the peer's branch name.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Payload {
    commits: Vec<RevCommit>,
    trees: Vec<RevTree>,
    blobs: Vec<RevBlob>,
    branches: BTreeMap<String, Ref>,
}

impl Payload {
    pub fn new() -> Payload {
        Payload::default()
    }

    pub fn with_commit(mut self, commit: RevCommit) -> Payload {
        self.commits.push(commit);
        self
    }

    pub fn with_tree(mut self, tree: RevTree) -> Payload {
        self.trees.push(tree);
        self
    }

    pub fn with_blob(mut self, blob: RevBlob) -> Payload {
        self.blobs.push(blob);
        self
    }

    /// Advertise the peer's head for `remote_branch`, replacing any earlier
    /// advertisement for the same name.
    pub fn with_branch(mut self, remote_branch: &str, head: Ref) -> Payload {
        self.branches.insert(remote_branch.to_string(), head);
        self
    }

    pub fn commits(&self) -> &[RevCommit] {
        &self.commits
    }

    pub fn trees(&self) -> &[RevTree] {
        &self.trees
    }

    pub fn blobs(&self) -> &[RevBlob] {
        &self.blobs
    }

    /// Peer branch name → advertised head, in name order.
    pub fn branches(&self) -> &BTreeMap<String, Ref> {
        &self.branches
    }

    /// Returns true if the payload carries no objects and no branch heads.
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
            && self.trees.is_empty()
            && self.blobs.is_empty()
            && self.branches.is_empty()
    }
}
