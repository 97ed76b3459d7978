use std::cmp::Ordering;
use std::collections::HashSet;
use std::str;

use super::{FileMode, Id, Kind, Object, RevObject, ID_LEN};

/// One named child of a tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreeEntry {
    mode: FileMode,
    name: String,
    id: Id,
}

impl TreeEntry {
    pub fn new(mode: FileMode, name: &str, id: Id) -> TreeEntry {
        TreeEntry {
            mode,
            name: name.to_string(),
            id,
        }
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    // Trees sort as if their name had a trailing slash.
    fn cmp_tree_order(&self, other: &TreeEntry) -> Ordering {
        sort_key(self.name.as_bytes(), self.mode).cmp(sort_key(other.name.as_bytes(), other.mode))
    }
}

fn sort_key(name: &[u8], mode: FileMode) -> impl Iterator<Item = u8> + '_ {
    let suffix: &[u8] = if mode.is_tree() { b"/" } else { b"" };
    name.iter().copied().chain(suffix.iter().copied())
}

/// A directory-like node referencing child trees and blobs by ID.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RevTree {
    id: Id,
    entries: Vec<TreeEntry>,
}

impl RevTree {
    /// Create a tree from its entries, which are sorted into tree order.
    /// The ID is computed from the canonical form.
    pub fn new(mut entries: Vec<TreeEntry>) -> RevTree {
        entries.sort_by(|a, b| a.cmp_tree_order(b));
        let id = super::hash_object(Kind::Tree, &encode(&entries));
        RevTree { id, entries }
    }

    /// Replace the declared ID, as a peer would when sending the tree.
    pub fn with_declared_id(mut self, id: Id) -> RevTree {
        self.id = id;
        self
    }

    /// Decode a tree object. The object's ID becomes the tree's ID.
    ///
    /// Returns `None` if the object is not a structurally valid tree.
    pub fn from_object(object: &Object) -> Option<RevTree> {
        if object.kind() != Kind::Tree || !tree_is_valid(object.content()) {
            return None;
        }

        Some(RevTree {
            id: *object.id(),
            entries: parse_entries(object.content())?,
        })
    }

    /// Return the entries in tree order.
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }
}

impl RevObject for RevTree {
    fn id(&self) -> &Id {
        &self.id
    }

    fn kind(&self) -> Kind {
        Kind::Tree
    }

    fn to_object(&self) -> Object {
        Object::new(Kind::Tree, encode(&self.entries))
    }
}

fn encode(entries: &[TreeEntry]) -> Vec<u8> {
    let mut content = Vec::new();
    for entry in entries {
        content.extend_from_slice(entry.mode.to_octal().as_bytes());
        content.push(b' ');
        content.extend_from_slice(entry.name.as_bytes());
        content.push(0);
        content.extend_from_slice(entry.id.as_bytes());
    }
    content
}

fn parse_entries(mut content: &[u8]) -> Option<Vec<TreeEntry>> {
    let mut entries = Vec::new();

    while !content.is_empty() {
        let space = content.iter().position(|b| *b == b' ')?;
        let mode = FileMode::from_octal(&content[..space])?;
        content = &content[space + 1..];

        let nul = content.iter().position(|b| *b == 0)?;
        let name = str::from_utf8(&content[..nul]).ok()?;
        content = &content[nul + 1..];

        if content.len() < ID_LEN {
            return None;
        }
        let id = Id::new(&content[..ID_LEN]).ok()?;
        content = &content[ID_LEN..];

        entries.push(TreeEntry::new(mode, name, id));
    }

    Some(entries)
}

fn name_is_valid(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.eq_ignore_ascii_case(".git")
        && !name.contains('/')
        && !name.contains('\0')
}

/// Checks that `content` decodes into entries with valid modes and names,
/// 20-byte IDs, and strictly increasing tree order with no repeated names.
pub(crate) fn tree_is_valid(content: &[u8]) -> bool {
    let entries = match parse_entries(content) {
        Some(entries) => entries,
        None => return false,
    };

    let mut names = HashSet::new();
    for (i, entry) in entries.iter().enumerate() {
        if !name_is_valid(&entry.name) || !names.insert(entry.name.as_str()) {
            return false;
        }
        if i > 0 && entries[i - 1].cmp_tree_order(entry) != Ordering::Less {
            return false;
        }
    }

    true
}
