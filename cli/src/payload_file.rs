//! The JSON form of a payload, as accepted by `strata apply-payload`.
//!
//! ```json
//! {
//!   "commits":  [{"id": "<hex>", "tree": "<hex>", "parents": ["<hex>"],
//!                 "author": "Name <email> 1142878501 +0230",
//!                 "committer": "Name <email> 1142878501 +0230",
//!                 "extra_headers": [["encoding", "ISO-8859-1"]],
//!                 "message": "..."}],
//!   "trees":    [{"id": "<hex>", "entries": [{"mode": "100644", "name": "a", "id": "<hex>"}]}],
//!   "blobs":    [{"id": "<hex>", "content": "text"}],
//!   "branches": {"<remote branch>": "<hex>"}
//! }
//! ```
//!
//! Every key is optional. An object without an `id` gets the one computed
//! from its content; an object with one keeps it, right or wrong, just as if
//! a peer had declared it. A document that is empty or `null` is an absent
//! payload.
//!
//! Attributions must be written exactly as they appear in a commit, so the
//! commit built from them hashes the way the sender's did.

use std::collections::BTreeMap;

use serde::Deserialize;
use strata_core::fetch::Payload;
use strata_core::object::{Attribution, FileMode, Id, RevBlob, RevCommit, RevTree, TreeEntry};
use strata_core::refs::{Ref, RefKind};

use crate::Result;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PayloadFile {
    commits: Vec<CommitFile>,
    trees: Vec<TreeFile>,
    blobs: Vec<BlobFile>,
    branches: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CommitFile {
    #[serde(default)]
    id: Option<String>,
    tree: String,
    #[serde(default)]
    parents: Vec<String>,
    author: String,
    committer: String,
    #[serde(default)]
    extra_headers: Vec<(String, String)>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TreeFile {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    entries: Vec<TreeEntryFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TreeEntryFile {
    mode: String,
    name: String,
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BlobFile {
    #[serde(default)]
    id: Option<String>,
    content: String,
}

/// Parse a payload document. Returns `None` for an absent payload.
pub(crate) fn parse(json: &[u8]) -> Result<Option<Payload>> {
    if json.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let file: Option<PayloadFile> = serde_json::from_slice(json)?;
    match file {
        Some(file) => file.into_payload().map(Some),
        None => Ok(None),
    }
}

impl PayloadFile {
    fn into_payload(self) -> Result<Payload> {
        let mut payload = Payload::new();

        for (n, c) in self.commits.into_iter().enumerate() {
            let what = format!("commits[{}]", n);
            let parents = c
                .parents
                .iter()
                .map(|p| parse_id(&what, p))
                .collect::<Result<Vec<Id>>>()?;

            let mut commit = RevCommit::new(
                parse_id(&what, &c.tree)?,
                parents,
                parse_attribution(&what, &c.author)?,
                parse_attribution(&what, &c.committer)?,
                &c.message,
            );
            for (name, value) in &c.extra_headers {
                commit = commit.with_extra_header(name, value);
            }
            payload = payload.with_commit(match c.id {
                Some(id) => commit.with_declared_id(parse_id(&what, &id)?),
                None => commit,
            });
        }

        for (n, t) in self.trees.into_iter().enumerate() {
            let what = format!("trees[{}]", n);
            let mut entries = Vec::with_capacity(t.entries.len());
            for e in &t.entries {
                let mode = FileMode::from_octal(e.mode.as_bytes())
                    .ok_or_else(|| format!("{}: invalid mode `{}`", what, e.mode))?;
                entries.push(TreeEntry::new(mode, &e.name, parse_id(&what, &e.id)?));
            }

            let tree = RevTree::new(entries);
            payload = payload.with_tree(match t.id {
                Some(id) => tree.with_declared_id(parse_id(&what, &id)?),
                None => tree,
            });
        }

        for (n, b) in self.blobs.into_iter().enumerate() {
            let what = format!("blobs[{}]", n);
            let blob = RevBlob::new(b.content.into_bytes());
            payload = payload.with_blob(match b.id {
                Some(id) => blob.with_declared_id(parse_id(&what, &id)?),
                None => blob,
            });
        }

        for (remote_branch, head) in &self.branches {
            let what = format!("branches[{}]", remote_branch);
            let head = Ref::new(remote_branch, parse_id(&what, head)?, RefKind::Commit);
            payload = payload.with_branch(remote_branch, head);
        }

        Ok(payload)
    }
}

fn parse_id(what: &str, hex: &str) -> Result<Id> {
    Id::from_hex(hex).map_err(|e| format!("{}: invalid ID `{}`: {}", what, hex, e).into())
}

fn parse_attribution(what: &str, s: &str) -> Result<Attribution> {
    let a = Attribution::parse(s.as_bytes())
        .ok_or_else(|| format!("{}: invalid attribution `{}`", what, s))?;

    if a.to_string() != s {
        return Err(format!(
            "{}: attribution `{}` is not in canonical form (`{}`)",
            what, s, a
        )
        .into());
    }

    Ok(a)
}
