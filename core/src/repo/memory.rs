//! A repository held entirely in memory.
//!
//! Useful as a scratch repository and as a reference for what the storage
//! traits require. It also counts writes so tests can assert on side effects.

use std::collections::{BTreeMap, HashMap};

use super::{Error, ObjectStore, RefStore, RemoteRefLog, Result};
use crate::object::{Id, Object};
use crate::refs::{check_ref_name, Ref};

/// Implementation of `Repo` that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryRepo {
    objects: HashMap<Id, Object>,
    refs: BTreeMap<String, Ref>,
    remote_refs: BTreeMap<String, BTreeMap<String, Id>>,
    object_puts: usize,
    ref_puts: usize,
    remote_ref_puts: usize,
}

impl MemoryRepo {
    pub fn new() -> MemoryRepo {
        MemoryRepo::default()
    }

    /// Number of objects stored.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of `put_object` calls made, including no-op ones.
    pub fn object_puts(&self) -> usize {
        self.object_puts
    }

    /// Number of `put_ref` and `update_ref` calls made.
    pub fn ref_puts(&self) -> usize {
        self.ref_puts
    }

    /// Number of `write_remote_ref` calls made.
    pub fn remote_ref_puts(&self) -> usize {
        self.remote_ref_puts
    }
}

impl ObjectStore for MemoryRepo {
    fn has_object(&self, id: &Id) -> Result<bool> {
        Ok(self.objects.contains_key(id))
    }

    fn put_object(&mut self, object: &Object) -> Result<Id> {
        self.object_puts += 1;

        let id = *object.id();
        self.objects.entry(id).or_insert_with(|| object.clone());
        Ok(id)
    }

    fn get_object(&self, id: &Id) -> Result<Option<Object>> {
        Ok(self.objects.get(id).cloned())
    }
}

impl RefStore for MemoryRepo {
    fn get_ref(&self, name: &str) -> Result<Option<Ref>> {
        Ok(self.refs.get(name).cloned())
    }

    fn put_ref(&mut self, r: &Ref) -> Result<()> {
        if !check_ref_name(r.name()) {
            return Err(Error::InvalidRefName(r.name().to_string()));
        }

        self.ref_puts += 1;
        self.refs.insert(r.name().to_string(), r.clone());
        Ok(())
    }

    fn refs(&self) -> Result<Vec<Ref>> {
        Ok(self.refs.values().cloned().collect())
    }
}

impl RemoteRefLog for MemoryRepo {
    fn write_remote_ref(
        &mut self,
        local_branch: &str,
        remote_branch: &str,
        id: &Id,
    ) -> Result<()> {
        self.remote_ref_puts += 1;
        self.remote_refs
            .entry(local_branch.to_string())
            .or_default()
            .insert(remote_branch.to_string(), *id);
        Ok(())
    }

    fn remote_refs(&self, local_branch: &str) -> Result<BTreeMap<String, Id>> {
        Ok(self
            .remote_refs
            .get(local_branch)
            .cloned()
            .unwrap_or_default())
    }
}
