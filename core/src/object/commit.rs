use std::str;

use super::parse_utils::{header, header_id, next_line};
use super::{Attribution, Id, Kind, Object, RevObject};

/// A commit: a snapshot (root tree) plus its ancestry and attribution.
///
/// Header lines this type doesn't model (`encoding`, `gpgsig`, `mergetag`,
/// ...) are carried verbatim so a decoded commit encodes back to the same
/// bytes and therefore the same ID.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RevCommit {
    id: Id,
    fields: CommitFields,
}

// Everything except the ID, as decoded from canonical content.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CommitFields {
    tree: Id,
    parents: Vec<Id>,
    author: Attribution,
    committer: Attribution,
    // Raw header lines between `committer` and the blank line, each
    // terminated by `\n`.
    extra_headers: Vec<u8>,
    // False only for decoded content that ends right after the headers.
    has_body: bool,
    message: String,
}

impl CommitFields {
    fn encode(&self) -> Vec<u8> {
        let mut content = format!("tree {}\n", self.tree);
        for parent in &self.parents {
            content.push_str(&format!("parent {}\n", parent));
        }
        content.push_str(&format!("author {}\n", self.author));
        content.push_str(&format!("committer {}\n", self.committer));

        let mut content = content.into_bytes();
        content.extend_from_slice(&self.extra_headers);
        if self.has_body {
            content.push(b'\n');
            content.extend_from_slice(self.message.as_bytes());
        }
        content
    }
}

impl RevCommit {
    /// Create a commit. The ID is computed from the canonical form.
    pub fn new(
        tree: Id,
        parents: Vec<Id>,
        author: Attribution,
        committer: Attribution,
        message: &str,
    ) -> RevCommit {
        RevCommit::from_fields(CommitFields {
            tree,
            parents,
            author,
            committer,
            extra_headers: Vec::new(),
            has_body: true,
            message: message.to_string(),
        })
    }

    fn from_fields(fields: CommitFields) -> RevCommit {
        let id = super::hash_object(Kind::Commit, &fields.encode());
        RevCommit { id, fields }
    }

    /// Append a header after `committer`. A multi-line value is written with
    /// git's continuation lines (each following line prefixed by a space).
    ///
    /// The ID is recomputed, replacing any declared ID.
    pub fn with_extra_header(mut self, name: &str, value: &str) -> RevCommit {
        let line = if value.is_empty() {
            format!("{}\n", name)
        } else {
            format!("{} {}\n", name, value.replace('\n', "\n "))
        };
        self.fields.extra_headers.extend_from_slice(line.as_bytes());
        RevCommit::from_fields(self.fields)
    }

    /// Replace the declared ID, as a peer would when sending the commit.
    pub fn with_declared_id(mut self, id: Id) -> RevCommit {
        self.id = id;
        self
    }

    /// Decode a commit object. The object's ID becomes the commit's ID.
    ///
    /// Returns `None` if the object is not a valid commit (see
    /// [`Object::is_valid`]).
    pub fn from_object(object: &Object) -> Option<RevCommit> {
        if object.kind() != Kind::Commit {
            return None;
        }

        Some(RevCommit {
            id: *object.id(),
            fields: parse_content(object.content())?,
        })
    }

    /// Return the root tree of this commit.
    pub fn tree(&self) -> &Id {
        &self.fields.tree
    }

    /// Return the parent commits, in order.
    pub fn parents(&self) -> &[Id] {
        &self.fields.parents
    }

    pub fn author(&self) -> &Attribution {
        &self.fields.author
    }

    pub fn committer(&self) -> &Attribution {
        &self.fields.committer
    }

    /// Return the raw header lines after `committer`, newline-terminated.
    pub fn extra_headers(&self) -> &[u8] {
        &self.fields.extra_headers
    }

    pub fn message(&self) -> &str {
        &self.fields.message
    }
}

impl RevObject for RevCommit {
    fn id(&self) -> &Id {
        &self.id
    }

    fn kind(&self) -> Kind {
        Kind::Commit
    }

    fn to_object(&self) -> Object {
        Object::new(Kind::Commit, self.fields.encode())
    }
}

// Decodes commit content. Content that would not encode back to the same
// bytes (non-canonical spacing in an identity, say) is rejected.
pub(crate) fn parse_content(content: &[u8]) -> Option<CommitFields> {
    let (line, mut rest) = next_line(content)?;
    let tree = header_id(line, b"tree")?;

    let mut parents = Vec::new();
    let line = loop {
        let (line, r) = next_line(rest)?;
        rest = r;
        match header(line, b"parent") {
            Some(hex) => parents.push(Id::from_hex(hex).ok()?),
            None => break line,
        }
    };

    let author = Attribution::parse(header(line, b"author")?)?;

    let (line, rest) = next_line(rest)?;
    let committer = Attribution::parse(header(line, b"committer")?)?;

    let headers_start = rest;
    let mut rest = rest;
    let body = loop {
        if rest.is_empty() {
            break None;
        }
        let (line, r) = next_line(rest)?;
        if line.is_empty() {
            break Some(r);
        }
        rest = r;
    };
    let extra_headers = headers_start[..headers_start.len() - rest.len()].to_vec();

    let fields = CommitFields {
        tree,
        parents,
        author,
        committer,
        extra_headers,
        has_body: body.is_some(),
        message: str::from_utf8(body.unwrap_or_default()).ok()?.to_string(),
    };

    if fields.encode() == content {
        Some(fields)
    } else {
        None
    }
}
