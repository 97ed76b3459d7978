//! Named pointers into the object graph.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::object::{Id, Kind};

/// Prefix for remote-tracking refs.
pub const REMOTES_PREFIX: &str = "refs/remotes/";

/// Prefix for tag refs.
pub const TAGS_PREFIX: &str = "refs/tags/";

/// Name of the single head tracked per remote.
pub const MASTER: &str = "master";

/// What a ref points at: an object of a particular kind, or a
/// remote-tracking head.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum RefKind {
    Commit,
    Tree,
    Blob,
    Tag,
    Remote,
}

impl From<Kind> for RefKind {
    fn from(kind: Kind) -> RefKind {
        match kind {
            Kind::Commit => RefKind::Commit,
            Kind::Tree => RefKind::Tree,
            Kind::Blob => RefKind::Blob,
            Kind::Tag => RefKind::Tag,
        }
    }
}

impl Display for RefKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RefKind::Commit => write!(f, "commit"),
            RefKind::Tree => write!(f, "tree"),
            RefKind::Blob => write!(f, "blob"),
            RefKind::Tag => write!(f, "tag"),
            RefKind::Remote => write!(f, "remote"),
        }
    }
}

impl FromStr for RefKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remote" => Ok(RefKind::Remote),
            _ => s.parse::<Kind>().map(RefKind::from),
        }
    }
}

/// A named pointer to an object.
///
/// Two refs are equal iff their name, target, and kind all match.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Ref {
    name: String,
    id: Id,
    kind: RefKind,
}

impl Ref {
    pub fn new(name: &str, id: Id, kind: RefKind) -> Ref {
        Ref {
            name: name.to_string(),
            id,
            kind,
        }
    }

    /// Return the ref's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the ID of the object this ref points at.
    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Return what kind of thing this ref points at.
    pub fn kind(&self) -> RefKind {
        self.kind
    }
}

/// Returns the remote-tracking ref name for a local branch:
/// `refs/remotes/<branch>/master`.
pub fn remote_tracking_name(branch: &str) -> String {
    format!("{}{}/{}", REMOTES_PREFIX, branch, MASTER)
}

/// Returns true if `name` can be used as a ref name.
///
/// Names are `/`-separated paths of non-empty components. A component may
/// not be `.` or `..`, start with `.`, or contain whitespace, control
/// characters, or any of `~^:?*[\`.
pub fn check_ref_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('/').all(|component| {
            !component.is_empty()
                && !component.starts_with('.')
                && !component.ends_with(".lock")
                && component
                    .chars()
                    .all(|c| !c.is_whitespace() && !c.is_control() && !"~^:?*[\\".contains(c))
        })
}
