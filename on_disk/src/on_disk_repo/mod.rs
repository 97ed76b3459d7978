//! A repository that stores content on the local file system.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use strata_core::repo::{Error, Result};
use tempfile::NamedTempFile;

mod objects;
mod refs;
mod remote_refs;

/// Implementation of `strata_core::repo::Repo` that stores content on the
/// local file system.
///
/// Objects are zlib-compressed loose files under `.git/objects`, each ref is
/// a file under `.git/refs`, and the remote-ref log lives under
/// `.git/remote-refs`. Every file is written to a temporary file first and
/// renamed into place, so a crash never leaves a half-written file behind.
#[derive(Debug)]
pub struct OnDiskRepo {
    work_dir: PathBuf,
    git_dir: PathBuf,
}

impl OnDiskRepo {
    /// Open an on-disk repository.
    ///
    /// `work_dir` should be the top-level working directory. A `.git` directory should
    /// exist at this path. Use `init` to create an empty on-disk repository if
    /// necessary.
    pub fn new(work_dir: &Path) -> Result<Self> {
        let work_dir = work_dir.to_path_buf();
        if !work_dir.exists() {
            return Err(Error::WorkDirDoesntExist(work_dir));
        }

        let git_dir = work_dir.join(".git");
        if !git_dir.exists() {
            return Err(Error::GitDirDoesntExist(git_dir));
        }

        Ok(OnDiskRepo { work_dir, git_dir })
    }

    /// Creates a new, empty repository on the local file system.
    ///
    /// Analogous to [`git init`](https://git-scm.com/docs/git-init).
    pub fn init(work_dir: &Path) -> Result<Self> {
        let git_dir = work_dir.join(".git");
        if git_dir.exists() {
            return Err(Error::GitDirShouldntExist(git_dir));
        }

        fs::create_dir_all(&git_dir)?;
        create_layout(&git_dir)?;

        tracing::debug!(git_dir = %git_dir.display(), "initialized repository");

        Ok(OnDiskRepo {
            work_dir: work_dir.to_path_buf(),
            git_dir,
        })
    }

    /// Return the working directory for this repo.
    pub fn work_dir(&self) -> &Path {
        self.work_dir.as_path()
    }

    /// Return the path to the `.git` directory.
    pub fn git_dir(&self) -> &Path {
        self.git_dir.as_path()
    }
}

// Writes `content` to `path` by way of a temporary file in `temp_dir`,
// creating the parent directory if needed.
fn write_atomically(temp_dir: &Path, path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut temp = NamedTempFile::new_in(temp_dir)?;
    temp.write_all(content)?;
    persist(temp, path)
}

fn persist(temp: NamedTempFile, path: &Path) -> Result<()> {
    temp.persist(path)
        .map(|_| ())
        .map_err(|e| Error::IoError(e.error))
}

// Reads a file, treating a missing one as `None`.
fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

const CONFIG: &str = "[core]\n\trepositoryformatversion = 0\n\tfilemode = true\n\tbare = false\n\tlogallrefupdates = true\n";

const DESCRIPTION: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";

const HEAD: &str = "ref: refs/heads/master\n";

const EXCLUDE: &str = "# git ls-files --others --exclude-from=.git/info/exclude\n# Lines that start with '#' are comments.\n# For a project mostly in C, the following would be a good set of\n# exclude patterns (uncomment them if you want to use them):\n# *.[oa]\n# *~\n.DS_Store\n";

// Hook samples are intentionally not created.
const LAYOUT_DIRS: &[&str] = &[
    "hooks",
    "info",
    "objects/info",
    "objects/pack",
    "refs/heads",
    "refs/tags",
];

const LAYOUT_FILES: &[(&str, &str)] = &[
    ("config", CONFIG),
    ("description", DESCRIPTION),
    ("HEAD", HEAD),
    ("info/exclude", EXCLUDE),
];

fn create_layout(git_dir: &Path) -> Result<()> {
    for dir in LAYOUT_DIRS {
        fs::create_dir_all(git_dir.join(dir))?;
    }

    for (name, content) in LAYOUT_FILES {
        fs::write(git_dir.join(name), content)?;
    }

    Ok(())
}
