//! Refs as files under `.git/refs`.
//!
//! A name that starts with `refs/` is stored at that path under `.git`. Any
//! other name is a local branch and is stored under `.git/refs/heads`, which
//! means `main` and `refs/heads/main` name the same file; listings use the
//! short form.
//!
//! Each file holds the target's hex ID followed by a newline. When the ref's
//! kind isn't the default for its namespace the kind follows the ID,
//! separated by a space.

use std::fs;
use std::path::{Path, PathBuf};
use std::str;

use strata_core::object::Id;
use strata_core::refs::{check_ref_name, Ref, RefKind, REMOTES_PREFIX, TAGS_PREFIX};
use strata_core::repo::{Error, RefStore, Result};

use super::{read_if_exists, write_atomically, OnDiskRepo};

const HEADS_PREFIX: &str = "refs/heads/";

impl OnDiskRepo {
    fn ref_path(&self, name: &str) -> PathBuf {
        if name.starts_with("refs/") {
            self.git_dir.join(name)
        } else {
            self.git_dir.join(HEADS_PREFIX).join(name)
        }
    }
}

fn default_kind(name: &str) -> RefKind {
    if name.starts_with(REMOTES_PREFIX) {
        RefKind::Remote
    } else if name.starts_with(TAGS_PREFIX) {
        RefKind::Tag
    } else {
        RefKind::Commit
    }
}

fn encode(r: &Ref) -> String {
    if r.kind() == default_kind(r.name()) {
        format!("{}\n", r.id())
    } else {
        format!("{} {}\n", r.id(), r.kind())
    }
}

fn decode(name: &str, content: &[u8]) -> Result<Ref> {
    let corrupt = |reason: &str| Error::CorruptRef {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let line = str::from_utf8(content)
        .map_err(|_| corrupt("not UTF-8"))?
        .trim_end_matches('\n');

    let mut parts = line.splitn(2, ' ');
    let id = parts.next().unwrap_or_default();
    let id = Id::from_hex(id).map_err(|e| corrupt(&e.to_string()))?;

    let kind = match parts.next() {
        Some(kind) => kind
            .parse::<RefKind>()
            .map_err(|_| corrupt(&format!("unknown kind `{}`", kind)))?,
        None => default_kind(name),
    };

    Ok(Ref::new(name, id, kind))
}

// Collects every ref file below `dir`; `prefix` is the ref name of `dir`.
fn walk(repo: &OnDiskRepo, dir: &Path, prefix: &str, refs: &mut Vec<Ref>) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let file_name = match file_name.to_str() {
            Some(file_name) => file_name,
            None => continue,
        };

        let name = format!("{}{}", prefix, file_name);
        let path = entry.path();
        if path.is_dir() {
            walk(repo, &path, &format!("{}/", name), refs)?;
        } else if let Some(r) = repo.get_ref(&name)? {
            refs.push(r);
        }
    }

    Ok(())
}

impl RefStore for OnDiskRepo {
    fn get_ref(&self, name: &str) -> Result<Option<Ref>> {
        // Names that could never have been written can't exist; this also
        // keeps `..` from escaping the git dir.
        if !check_ref_name(name) {
            return Ok(None);
        }

        let path = self.ref_path(name);
        if path.is_dir() {
            return Ok(None);
        }

        match read_if_exists(&path)? {
            Some(content) => decode(name, &content).map(Some),
            None => Ok(None),
        }
    }

    fn put_ref(&mut self, r: &Ref) -> Result<()> {
        if !check_ref_name(r.name()) {
            return Err(Error::InvalidRefName(r.name().to_string()));
        }

        let path = self.ref_path(r.name());
        write_atomically(&self.git_dir, &path, encode(r).as_bytes())?;

        tracing::debug!(name = r.name(), id = %r.id(), kind = %r.kind(), "wrote ref");
        Ok(())
    }

    fn refs(&self) -> Result<Vec<Ref>> {
        let mut refs = Vec::new();

        let refs_dir = self.git_dir.join("refs");
        if refs_dir.is_dir() {
            for entry in fs::read_dir(&refs_dir)? {
                let entry = entry?;
                let path = entry.path();
                let file_name = entry.file_name();
                let file_name = match file_name.to_str() {
                    Some(file_name) => file_name,
                    None => continue,
                };

                if file_name == "heads" {
                    walk(self, &path, "", &mut refs)?;
                } else if path.is_dir() {
                    walk(self, &path, &format!("refs/{}/", file_name), &mut refs)?;
                }
            }
        }

        refs.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(refs)
    }
}
