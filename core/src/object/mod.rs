//! Represents the concept of an "object" which is a tuple of
//! object type and binary data identified by the hash of the binary data,
//! plus the typed commit, tree, and blob views that know how to produce
//! that binary data in canonical form.

use sha1::{Digest, Sha1};

mod attribution;
pub use attribution::Attribution;

mod blob;
pub use blob::RevBlob;

mod check_tag;

mod commit;
pub use commit::RevCommit;

mod file_mode;
pub use file_mode::FileMode;

mod id;
pub use id::{Id, ParseIdError, ID_LEN};

mod kind;
pub use kind::Kind;

pub(crate) mod parse_utils;

mod tree;
pub use tree::{RevTree, TreeEntry};

/// Describes a single object stored (or about to be stored) in a repository.
///
/// The ID is always computed from the kind and content; it cannot be
/// supplied by the caller.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Object {
    id: Id,
    kind: Kind,
    content: Vec<u8>,
}

impl Object {
    /// Create a new Object and compute its ID.
    pub fn new(kind: Kind, content: Vec<u8>) -> Object {
        let id = hash_object(kind, &content);
        Object { id, kind, content }
    }

    /// Return the ID of the object.
    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Return the kind of the object.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Return the size (in bytes) of the object.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true if the object is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Return the canonical content of the object.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Consume the object, returning its content.
    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    /// Returns true if the content of the object is structurally valid for its kind.
    pub fn is_valid(&self) -> bool {
        match self.kind {
            Kind::Blob => true,
            Kind::Commit => commit::parse_content(&self.content).is_some(),
            Kind::Tag => check_tag::tag_is_valid(&self.content),
            Kind::Tree => tree::tree_is_valid(&self.content),
        }
    }
}

/// Computes the ID for content of the given kind.
///
/// This is SHA-1 over `"<kind> <len>\0"` followed by the content, which is
/// functionally equivalent to
/// [`git hash-object`](https://git-scm.com/docs/git-hash-object).
pub fn hash_object(kind: Kind, content: &[u8]) -> Id {
    let mut hasher = Sha1::new();

    hasher.update(kind.to_string());
    hasher.update(b" ");
    hasher.update(content.len().to_string());
    hasher.update(b"\0");
    hasher.update(content);

    let mut digest = [0u8; ID_LEN];
    digest.copy_from_slice(hasher.finalize().as_slice());
    Id::from_digest(digest)
}

/// A typed, versioned object as carried in a fetch payload.
///
/// `id()` returns the ID the object was declared with. For objects built
/// locally this is the content hash; objects received from a peer carry the
/// peer's claim, which only matches `to_object().id()` if the peer is honest.
pub trait RevObject {
    /// The declared ID of this object.
    fn id(&self) -> &Id;

    /// The kind of object.
    fn kind(&self) -> Kind;

    /// Serialize into canonical form.
    fn to_object(&self) -> Object;
}
