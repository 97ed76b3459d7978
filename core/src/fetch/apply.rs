use tracing::{debug, info, info_span};

use super::{ApplyOptions, FetchEvent, FetchObserver, FetchResult, Payload};
use crate::object::{Id, RevObject};
use crate::refs::{self, Ref, RefKind};
use crate::repo::{Error, Repo, Result};

/// Merges a [`Payload`] into a repository.
///
/// ## Behavior
///
/// Objects are processed in the order commits, trees, blobs, each list in the
/// order the peer sent it. An object whose declared ID is already stored is
/// skipped; anything else is written and counted. Inserting a commit points
/// the local branch ref at it; what trees and blobs do to refs depends on
/// [`ApplyOptions::branch_refs`].
///
/// Each advertised peer branch is then reconciled with the remote-tracking
/// ref `refs/remotes/<branch>/master`. That ref, and the remote-ref log
/// entry for the peer branch, are written only when the ref is missing or
/// differs from the advertised head.
///
/// ## Failure
///
/// Nothing is rolled back. If a write fails partway through, everything
/// before it stays written and the error is returned. Applying the same
/// payload again picks up where the failed call stopped, since objects that
/// made it into the store are skipped.
pub struct PayloadApplier<'a, R: Repo + ?Sized> {
    repo: &'a mut R,
    options: ApplyOptions,
    observer: Option<&'a mut dyn FetchObserver>,
}

impl<'a, R: Repo + ?Sized> PayloadApplier<'a, R> {
    pub fn new(repo: &'a mut R) -> Self {
        PayloadApplier {
            repo,
            options: ApplyOptions::default(),
            observer: None,
        }
    }

    pub fn with_options(mut self, options: ApplyOptions) -> Self {
        self.options = options;
        self
    }

    /// Report each [`FetchEvent`] to `observer` as it happens.
    pub fn with_observer(mut self, observer: &'a mut dyn FetchObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn options(&self) -> &ApplyOptions {
        &self.options
    }

    /// Apply `payload` to the local branch `branch`.
    ///
    /// An absent payload is a no-op that returns an empty [`FetchResult`].
    pub fn apply(&mut self, branch: &str, payload: Option<&Payload>) -> Result<FetchResult> {
        let payload = match payload {
            Some(payload) => payload,
            None => {
                debug!(%branch, "no payload to apply");
                return Ok(FetchResult::new());
            }
        };

        let span = info_span!("apply_payload", %branch);
        let _enter = span.enter();

        let mut result = FetchResult::new();

        for commit in payload.commits() {
            match self.insert(commit)? {
                Some(id) => {
                    self.move_branch_ref(branch, id, RefKind::Commit)?;
                    result.add_commit();
                    self.emit(FetchEvent::CommitAdded {
                        id,
                        branch: branch.to_string(),
                    });
                }
                None => self.emit(FetchEvent::CommitSkipped { id: *commit.id() }),
            }
        }

        for tree in payload.trees() {
            match self.insert(tree)? {
                Some(id) => {
                    self.move_branch_ref(branch, id, RefKind::Tree)?;
                    result.add_tree();
                    self.emit(FetchEvent::TreeAdded { id });
                }
                None => self.emit(FetchEvent::TreeSkipped { id: *tree.id() }),
            }
        }

        for blob in payload.blobs() {
            match self.insert(blob)? {
                Some(id) => {
                    self.move_branch_ref(branch, id, RefKind::Blob)?;
                    result.add_blob();
                    self.emit(FetchEvent::BlobAdded { id });
                }
                None => self.emit(FetchEvent::BlobSkipped { id: *blob.id() }),
            }
        }

        for (remote_branch, head) in payload.branches() {
            self.reconcile_remote_ref(branch, remote_branch, head.id())?;
            result.add_branch();
        }

        info!(
            commits = result.commits(),
            trees = result.trees(),
            blobs = result.blobs(),
            branches = result.branches(),
            "applied payload"
        );
        Ok(result)
    }

    /// Stores `rev` unless its declared ID is already present.
    ///
    /// Returns the ID the store assigned, or `None` if the object was skipped.
    fn insert<O: RevObject>(&mut self, rev: &O) -> Result<Option<Id>> {
        let declared = *rev.id();

        let mut object = None;
        if self.options.verify_ids {
            let computed = rev.to_object();
            if *computed.id() != declared {
                return Err(Error::IdMismatch {
                    kind: rev.kind(),
                    declared,
                    computed: *computed.id(),
                });
            }
            object = Some(computed);
        }

        if self.repo.has_object(&declared)? {
            debug!(kind = %rev.kind(), id = %declared, "already have object");
            return Ok(None);
        }

        let object = object.unwrap_or_else(|| rev.to_object());
        if self.options.check_objects && !object.is_valid() {
            return Err(Error::CorruptObject {
                kind: rev.kind(),
                id: declared,
            });
        }

        let id = self.repo.put_object(&object)?;
        debug!(kind = %rev.kind(), %id, "inserted object");
        Ok(Some(id))
    }

    fn move_branch_ref(&mut self, branch: &str, id: Id, kind: RefKind) -> Result<()> {
        match self.options.branch_refs.ref_name(branch, kind) {
            Some(name) => self.repo.put_ref(&Ref::new(&name, id, kind)),
            None => Ok(()),
        }
    }

    fn reconcile_remote_ref(&mut self, branch: &str, remote_branch: &str, head: &Id) -> Result<()> {
        let ref_name = refs::remote_tracking_name(branch);
        let tracking = Ref::new(&ref_name, *head, RefKind::Remote);

        let existing = self.repo.get_ref(&ref_name)?;
        if existing.as_ref() == Some(&tracking) {
            debug!(%remote_branch, %ref_name, "remote-tracking ref up to date");
            self.emit(FetchEvent::RemoteRefUnchanged {
                remote_branch: remote_branch.to_string(),
                ref_name,
                id: *head,
            });
            return Ok(());
        }

        self.repo.update_ref(&tracking)?;
        self.repo.write_remote_ref(branch, remote_branch, head)?;

        info!("   {} {} -> {}", head.short(), remote_branch, ref_name);
        self.emit(FetchEvent::RemoteRefUpdated {
            remote_branch: remote_branch.to_string(),
            ref_name,
            old: existing.map(|r| *r.id()),
            new: *head,
        });
        Ok(())
    }

    fn emit(&mut self, event: FetchEvent) {
        if let Some(observer) = &mut self.observer {
            observer.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests;
