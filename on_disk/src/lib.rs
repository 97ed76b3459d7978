//! This crate provides a strata repository that stores content on the local
//! file system.
//!
//! **IMPORTANT NOTE:** This is intended as a reference implementation. It
//! assumes a single writer and does no locking.
//!
//! It uses the same `.git` folder layout as command-line git for objects and
//! refs, so loose objects written here can be read by `git cat-file`.

mod on_disk_repo;
pub use on_disk_repo::OnDiskRepo;
