use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str;

use strata_core::object::Id;
use strata_core::refs::check_ref_name;
use strata_core::repo::{Error, RemoteRefLog, Result};

use super::{read_if_exists, write_atomically, OnDiskRepo};

const LOG_DIR: &str = "remote-refs";

impl OnDiskRepo {
    fn remote_ref_log_path(&self, local_branch: &str) -> Result<PathBuf> {
        if !check_ref_name(local_branch) {
            return Err(Error::InvalidRefName(local_branch.to_string()));
        }
        Ok(self.git_dir.join(LOG_DIR).join(local_branch))
    }
}

fn parse_log(local_branch: &str, content: &[u8]) -> Result<BTreeMap<String, Id>> {
    let corrupt = |reason: String| Error::CorruptRef {
        name: format!("{}/{}", LOG_DIR, local_branch),
        reason,
    };

    let content = str::from_utf8(content).map_err(|_| corrupt("not UTF-8".to_string()))?;

    let mut log = BTreeMap::new();
    for (n, line) in content.lines().enumerate() {
        let mut parts = line.splitn(2, '\t');
        let id = parts.next().unwrap_or_default();
        let remote_branch = parts
            .next()
            .ok_or_else(|| corrupt(format!("line {}: missing remote branch", n + 1)))?;
        let id = Id::from_hex(id).map_err(|e| corrupt(format!("line {}: {}", n + 1, e)))?;

        log.insert(remote_branch.to_string(), id);
    }

    Ok(log)
}

fn format_log(log: &BTreeMap<String, Id>) -> String {
    log.iter()
        .map(|(remote_branch, id)| format!("{}\t{}\n", id, remote_branch))
        .collect()
}

impl RemoteRefLog for OnDiskRepo {
    /// Records `id` for `remote_branch` in `.git/remote-refs/<local_branch>`,
    /// replacing any earlier entry for the same remote branch.
    fn write_remote_ref(
        &mut self,
        local_branch: &str,
        remote_branch: &str,
        id: &Id,
    ) -> Result<()> {
        if remote_branch.is_empty() || remote_branch.contains(|c: char| c == '\t' || c == '\n') {
            return Err(Error::InvalidRefName(remote_branch.to_string()));
        }

        let path = self.remote_ref_log_path(local_branch)?;
        let mut log = match read_if_exists(&path)? {
            Some(content) => parse_log(local_branch, &content)?,
            None => BTreeMap::new(),
        };

        log.insert(remote_branch.to_string(), *id);
        write_atomically(&self.git_dir, &path, format_log(&log).as_bytes())?;

        tracing::debug!(%local_branch, %remote_branch, %id, "recorded remote ref");
        Ok(())
    }

    fn remote_refs(&self, local_branch: &str) -> Result<BTreeMap<String, Id>> {
        let path = self.remote_ref_log_path(local_branch)?;
        match read_if_exists(&path)? {
            Some(content) => parse_log(local_branch, &content),
            None => Ok(BTreeMap::new()),
        }
    }
}
