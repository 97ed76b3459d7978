/// Describes the type of a tree entry.
///
/// Git uses a variation on the Unix file permissions flags to denote an entry's
/// intended type on disk. The following values are recognized:
///
/// * `0o100644` - normal file
/// * `0o100755` - executable file
/// * `0o120000` - symbolic link
/// * `0o040000` - tree (subdirectory)
/// * `0o160000` - submodule (aka gitlink)
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum FileMode {
    Normal,
    Executable,
    SymbolicLink,
    Tree,
    Submodule,
}

impl FileMode {
    /// Convert from git file-mode integer to `FileMode` enum.
    ///
    /// Returns `None` if the value is not one of the recognized constants.
    pub fn from_value(value: u32) -> Option<FileMode> {
        match value {
            0o100644 => Some(FileMode::Normal),
            0o100755 => Some(FileMode::Executable),
            0o120000 => Some(FileMode::SymbolicLink),
            0o040000 => Some(FileMode::Tree),
            0o160000 => Some(FileMode::Submodule),
            _ => None,
        }
    }

    /// Convert from `FileMode` enum to git file-mode integer.
    pub fn to_value(self) -> u32 {
        match self {
            FileMode::Normal => 0o100644,
            FileMode::Executable => 0o100755,
            FileMode::SymbolicLink => 0o120000,
            FileMode::Tree => 0o040000,
            FileMode::Submodule => 0o160000,
        }
    }

    /// Parse the octal form used in tree entries (`"100644"`, `"40000"`).
    ///
    /// Leading zeros are rejected, as git does.
    pub fn from_octal(s: &[u8]) -> Option<FileMode> {
        if s.is_empty() || s[0] == b'0' {
            return None;
        }

        let mut value: u32 = 0;
        for &c in s {
            if !(b'0'..=b'7').contains(&c) || value > 0o777777 {
                return None;
            }
            value = value * 8 + u32::from(c - b'0');
        }

        FileMode::from_value(value)
    }

    /// Format as the octal form used in tree entries.
    pub fn to_octal(self) -> String {
        format!("{:o}", self.to_value())
    }

    /// Returns true if the entry refers to a subtree.
    pub fn is_tree(self) -> bool {
        self == FileMode::Tree
    }
}
