//! Merging a peer's objects and branch heads into a local repository.
//!
//! A fetch produces a [`Payload`]: the commits, trees, and blobs the peer
//! believes we are missing, plus the heads of the peer's branches. A
//! [`PayloadApplier`] inserts whatever is actually missing, moves the local
//! branch ref, records the peer's heads as remote-tracking refs, and reports
//! what it did as a [`FetchResult`] and a feed of [`FetchEvent`]s.

mod apply;
pub use apply::PayloadApplier;

mod event;
pub use event::{FetchEvent, FetchObserver};

mod options;
pub use options::{ApplyOptions, BranchRefMode};

mod payload;
pub use payload::Payload;

mod result;
pub use result::FetchResult;
