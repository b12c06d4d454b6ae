//! Hierarchical namespaces walked by [`Traverse`](super::Traverse).
//!
//! A trail is the list of branch names from the root down to the current
//! level; the root itself is the empty trail.

use std::io;
use std::path::{PathBuf, MAIN_SEPARATOR};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Cannot be entered.
    Leaf,
    /// Has its own listing.
    Branch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
}

impl Entry {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: EntryKind::Leaf }
    }

    pub fn branch(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: EntryKind::Branch }
    }

    pub fn is_branch(&self) -> bool {
        self.kind == EntryKind::Branch
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    /// The level exists but cannot be listed right now. The user can go
    /// back and try elsewhere.
    #[error("{name}: {reason}")]
    NotAccessible { name: String, reason: String },

    /// The namespace itself is broken.
    #[error("{0}")]
    Failed(String),
}

pub trait Namespace {
    /// Entries directly under `trail`, in display order.
    fn list(&mut self, trail: &[String]) -> Result<Vec<Entry>, NamespaceError>;

    /// How the trail is shown in the info slot.
    fn render_trail(&self, trail: &[String]) -> String {
        let mut out = String::new();
        for name in trail {
            out.push_str(name);
            out.push('/');
        }
        out
    }

    /// How an entry is shown in the list.
    fn label(&self, entry: &Entry) -> String {
        entry.name.clone()
    }
}

// =============================================================================
// Filesystem
// =============================================================================

/// Directories under `root`. Directories (and symlinks to them) are
/// branches; everything else is a leaf.
#[derive(Debug, Clone)]
pub struct FsNamespace {
    root: PathBuf,
}

impl FsNamespace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Absolute path of `trail`.
    pub fn path(&self, trail: &[String]) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(trail);
        path
    }
}

impl Namespace for FsNamespace {
    fn list(&mut self, trail: &[String]) -> Result<Vec<Entry>, NamespaceError> {
        let path = self.path(trail);
        let name = trail.last().cloned().unwrap_or_else(|| self.root.display().to_string());
        let inaccessible = |err: io::Error| match err.kind() {
            io::ErrorKind::PermissionDenied | io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => {
                NamespaceError::NotAccessible { name: name.clone(), reason: err.to_string() }
            }
            _ => NamespaceError::Failed(format!("{}: {err}", path.display())),
        };

        let mut entries = Vec::new();
        for item in std::fs::read_dir(&path).map_err(inaccessible)? {
            let item = item.map_err(inaccessible)?;
            let kind = if item.path().is_dir() { EntryKind::Branch } else { EntryKind::Leaf };
            entries.push(Entry { name: item.file_name().to_string_lossy().into_owned(), kind });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn render_trail(&self, trail: &[String]) -> String {
        let mut rendered = self.path(trail).display().to_string();
        if !rendered.ends_with(MAIN_SEPARATOR) {
            rendered.push(MAIN_SEPARATOR);
        }
        rendered
    }

    fn label(&self, entry: &Entry) -> String {
        match entry.kind {
            EntryKind::Branch => format!("{}{MAIN_SEPARATOR}", entry.name),
            EntryKind::Leaf => entry.name.clone(),
        }
    }
}
