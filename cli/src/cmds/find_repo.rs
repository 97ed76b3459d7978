use std::{env, path::Path};

use strata_core::repo::Result;
use strata_on_disk::OnDiskRepo;

// Discover a repo starting from the given path.
//
// For now this handles only the simplest case, where there is a `.git`
// directory directly within the given path. Parent directories are not
// searched.
pub fn from_path<P: AsRef<Path>>(path: P) -> Result<OnDiskRepo> {
    OnDiskRepo::new(path.as_ref())
}

// Discover a repo starting from the current working directory.
#[cfg(not(tarpaulin_include))]
pub fn from_current_dir() -> Result<OnDiskRepo> {
    let path = env::current_dir()?;
    from_path(path)
}
