use std::fmt;

use crate::object::Id;

/// Something a payload application did (or decided not to do).
///
/// Events are emitted in the order the work happens, and only after the
/// corresponding write has succeeded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FetchEvent {
    /// A commit was inserted and `branch` now points at it.
    CommitAdded { id: Id, branch: String },

    /// A commit was already present.
    CommitSkipped { id: Id },

    TreeAdded { id: Id },
    TreeSkipped { id: Id },
    BlobAdded { id: Id },
    BlobSkipped { id: Id },

    /// A remote-tracking ref was created or moved.
    RemoteRefUpdated {
        remote_branch: String,
        ref_name: String,
        old: Option<Id>,
        new: Id,
    },

    /// A remote-tracking ref already pointed at the advertised head.
    RemoteRefUnchanged {
        remote_branch: String,
        ref_name: String,
        id: Id,
    },
}

impl fmt::Display for FetchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchEvent::CommitAdded { id, branch } => {
                write!(f, "added commit {} to {}", id.short(), branch)
            }
            FetchEvent::CommitSkipped { id } => write!(f, "have commit {}", id.short()),
            FetchEvent::TreeAdded { id } => write!(f, "added tree {}", id.short()),
            FetchEvent::TreeSkipped { id } => write!(f, "have tree {}", id.short()),
            FetchEvent::BlobAdded { id } => write!(f, "added blob {}", id.short()),
            FetchEvent::BlobSkipped { id } => write!(f, "have blob {}", id.short()),
            FetchEvent::RemoteRefUpdated {
                remote_branch,
                ref_name,
                old: Some(old),
                new,
            } => write!(
                f,
                "   {}..{}  {} -> {}",
                old.short(),
                new.short(),
                remote_branch,
                ref_name
            ),
            FetchEvent::RemoteRefUpdated {
                remote_branch,
                ref_name,
                old: None,
                new,
            } => write!(
                f,
                " * {}  {} -> {}",
                new.short(),
                remote_branch,
                ref_name
            ),
            FetchEvent::RemoteRefUnchanged {
                remote_branch,
                ref_name,
                id,
            } => write!(f, " = {}  {} -> {}", id.short(), remote_branch, ref_name),
        }
    }
}

/// Receives the events of a payload application as they happen.
pub trait FetchObserver {
    fn on_event(&mut self, event: &FetchEvent);
}

impl FetchObserver for Vec<FetchEvent> {
    fn on_event(&mut self, event: &FetchEvent) {
        self.push(event.clone());
    }
}

impl<F> FetchObserver for F
where
    F: FnMut(&FetchEvent),
{
    fn on_event(&mut self, event: &FetchEvent) {
        self(event)
    }
}
