use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::refs::RefKind;

/// Which refs are moved when trees and blobs are inserted.
///
/// Commits always move the ref named after the local branch.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BranchRefMode {
    /// Trees and blobs write no ref.
    CommitsOnly,

    /// Trees and blobs write `refs/trees/<branch>` and `refs/blobs/<branch>`.
    PerKind,

    /// Trees and blobs overwrite the branch ref with their own kind.
    Shared,
}

impl BranchRefMode {
    /// Returns the name of the ref an inserted object of `kind` moves, if any.
    pub fn ref_name(self, branch: &str, kind: RefKind) -> Option<String> {
        match (self, kind) {
            (_, RefKind::Commit) => Some(branch.to_string()),
            (BranchRefMode::CommitsOnly, _) => None,
            (BranchRefMode::PerKind, RefKind::Tree) => Some(format!("refs/trees/{}", branch)),
            (BranchRefMode::PerKind, RefKind::Blob) => Some(format!("refs/blobs/{}", branch)),
            (BranchRefMode::PerKind, _) => None,
            (BranchRefMode::Shared, _) => Some(branch.to_string()),
        }
    }
}

impl Default for BranchRefMode {
    fn default() -> Self {
        BranchRefMode::CommitsOnly
    }
}

impl Display for BranchRefMode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            BranchRefMode::CommitsOnly => write!(f, "commits-only"),
            BranchRefMode::PerKind => write!(f, "per-kind"),
            BranchRefMode::Shared => write!(f, "shared"),
        }
    }
}

impl FromStr for BranchRefMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "commits-only" => Ok(BranchRefMode::CommitsOnly),
            "per-kind" => Ok(BranchRefMode::PerKind),
            "shared" => Ok(BranchRefMode::Shared),
            _ => Err(()),
        }
    }
}

/// Knobs for [`PayloadApplier`](super::PayloadApplier).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ApplyOptions {
    /// Which refs trees and blobs move.
    pub branch_refs: BranchRefMode,

    /// Recompute every object's ID and reject the payload if it differs
    /// from the one the peer declared.
    pub verify_ids: bool,

    /// Reject objects whose canonical form is structurally invalid.
    pub check_objects: bool,
}

impl ApplyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_branch_refs(mut self, mode: BranchRefMode) -> Self {
        self.branch_refs = mode;
        self
    }

    pub fn with_verify_ids(mut self, verify: bool) -> Self {
        self.verify_ids = verify;
        self
    }

    pub fn with_check_objects(mut self, check: bool) -> Self {
        self.check_objects = check;
        self
    }
}
