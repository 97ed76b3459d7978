//! Represents an abstract repository.
//!
//! ## Design Goals
//!
//! Repositories may be stored by multiple different mechanisms. This crate
//! includes an in-memory repository (see `strata_core::repo::memory`); the
//! `strata_on_disk` crate provides one stored in a `.git` directory. You could
//! envision repositories stored on a remote file system or database as well.

use std::collections::BTreeMap;

use crate::fetch::{FetchResult, Payload, PayloadApplier};
use crate::object::{Id, Object};
use crate::refs::Ref;

mod error;
pub use error::{Error, Result};

pub mod memory;
pub use memory::MemoryRepo;

/// Content-addressable storage for immutable objects.
pub trait ObjectStore {
    /// Returns true if an object with this ID is stored.
    fn has_object(&self, id: &Id) -> Result<bool>;

    /// Stores an object under its content ID and returns that ID.
    ///
    /// Storing an object that is already present is a no-op.
    fn put_object(&mut self, object: &Object) -> Result<Id>;

    /// Reads an object, if present.
    fn get_object(&self, id: &Id) -> Result<Option<Object>>;
}

/// Mapping from ref name to (object ID, kind).
pub trait RefStore {
    /// Looks up a ref by exact name.
    fn get_ref(&self, name: &str) -> Result<Option<Ref>>;

    /// Creates or overwrites a ref.
    fn put_ref(&mut self, r: &Ref) -> Result<()>;

    /// Overwrites a ref. Used for remote-tracking refs.
    fn update_ref(&mut self, r: &Ref) -> Result<()> {
        self.put_ref(r)
    }

    /// Lists all refs, sorted by name.
    fn refs(&self) -> Result<Vec<Ref>>;
}

/// Durable record of which object each remote branch pointed at when it was
/// last fetched into a given local branch.
///
/// This is kept separately from the ref table so the remote branch name that
/// produced a remote-tracking ref is not lost.
pub trait RemoteRefLog {
    fn write_remote_ref(&mut self, local_branch: &str, remote_branch: &str, id: &Id)
        -> Result<()>;

    /// Returns remote branch name → ID for everything recorded under `local_branch`.
    fn remote_refs(&self, local_branch: &str) -> Result<BTreeMap<String, Id>>;
}

/// A struct that implements the `Repo` trait represents a particular mechanism
/// for storing and accessing a repository.
///
/// The required methods (from `ObjectStore`, `RefStore`, and `RemoteRefLog`)
/// are the most primitive operations which must be defined for a given storage
/// architecture. The provided methods on this trait are the higher-level
/// operations, regardless of storage mechanism.
///
/// A repository has a single writer: callers that share one between threads
/// must serialize access themselves.
pub trait Repo: ObjectStore + RefStore + RemoteRefLog {
    /// Merges a peer's payload into this repository using default options.
    ///
    /// See [`PayloadApplier`] for the details and for non-default options.
    fn apply_payload(&mut self, branch: &str, payload: Option<&Payload>) -> Result<FetchResult>
    where
        Self: Sized,
    {
        PayloadApplier::new(self).apply(branch, payload)
    }
}

impl<T: ObjectStore + RefStore + RemoteRefLog> Repo for T {}
