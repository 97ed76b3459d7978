use std::{
    env,
    path::{Path, PathBuf},
};

// Changes the process's working directory until dropped, then changes it
// back. Commands find their repository through the working directory, so
// in-process tests of those commands need this.
//
// Panics instead of returning errors; test use only. The working directory
// is process-wide, so every test that uses this must be marked #[serial].
pub(crate) struct TempCwd {
    old_path: PathBuf,
}

impl TempCwd {
    pub fn new<P: AsRef<Path>>(path: P) -> TempCwd {
        let old_path = env::current_dir().unwrap();
        env::set_current_dir(path).unwrap();

        TempCwd { old_path }
    }
}

impl Drop for TempCwd {
    fn drop(&mut self) {
        env::set_current_dir(&self.old_path).unwrap();
    }
}
