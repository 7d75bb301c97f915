use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::models::DirEntryInfo;

/// A directory-listing request the caller must satisfy out of band and feed
/// back through [`FileTreeCache::apply_listing`]. `root_gen` ties the request
/// to the root that issued it. `deep` asks for already-expanded descendants
/// to be refilled as their listings arrive; `expand_children` asks for every
/// discovered subdirectory to be expanded in turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub root_gen: u64,
    pub path: PathBuf,
    pub deep: bool,
    pub expand_children: bool,
}

/// One materialized directory level.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub entries: Vec<DirEntryInfo>,
}

/// Lazily materialized view of the workspace directory. Only expanded
/// directories hold children. A listing is admitted only if its root
/// generation is current and its path is still expanded, so collapses and
/// root changes win over in-flight listings. Collapsing keeps descendants
/// in the expansion set for restore on re-expand.
pub struct FileTreeCache {
    root: Option<PathBuf>,
    /// Bumped on every root change; listings carrying an older generation
    /// are discarded.
    root_gen: u64,
    expanded: HashSet<PathBuf>,
    children: BTreeMap<PathBuf, TreeNode>,
}

impl FileTreeCache {
    pub fn new() -> Self {
        Self {
            root: None,
            root_gen: 0,
            expanded: HashSet::new(),
            children: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn root_gen(&self) -> u64 {
        self.root_gen
    }

    pub fn is_expanded(&self, path: &Path) -> bool {
        self.expanded.contains(path)
    }

    /// Children of `path`, if that level has been materialized.
    pub fn children_of(&self, path: &Path) -> Option<&[DirEntryInfo]> {
        self.children.get(path).map(|n| n.entries.as_slice())
    }

    /// Points the tree at a new root. All expansion state and cached
    /// listings from the previous root are discarded.
    pub fn set_root(&mut self, root: PathBuf) -> FetchRequest {
        self.root = Some(root.clone());
        self.root_gen += 1;
        self.expanded.clear();
        self.children.clear();
        FetchRequest {
            root_gen: self.root_gen,
            path: root,
            deep: false,
            expand_children: false,
        }
    }

    /// Expands or collapses one directory. Expanding returns a fetch for its
    /// listing; collapsing drops the cached children but remembers which
    /// descendants were open.
    pub fn toggle(&mut self, path: &Path) -> Option<FetchRequest> {
        if self.expanded.remove(path) {
            // Drop cached listings for the whole subtree; descendants stay
            // in the expansion set so re-expanding restores the shape.
            self.children.retain(|p, _| !p.starts_with(path));
            return None;
        }
        self.expanded.insert(path.to_path_buf());
        Some(FetchRequest {
            root_gen: self.root_gen,
            path: path.to_path_buf(),
            deep: true,
            expand_children: false,
        })
    }

    /// Expands `path` and every directory beneath it. Each arriving listing
    /// expands the subdirectories it reveals, so the cascade runs until the
    /// whole subtree is open. Directories outside `path` are untouched.
    pub fn expand_all(&mut self, path: &Path) -> Option<FetchRequest> {
        self.root.as_ref()?;
        self.expanded.insert(path.to_path_buf());
        Some(FetchRequest {
            root_gen: self.root_gen,
            path: path.to_path_buf(),
            deep: false,
            expand_children: true,
        })
    }

    /// Re-lists the root and every expanded directory without touching the
    /// expansion set.
    pub fn refresh(&mut self) -> Vec<FetchRequest> {
        let Some(root) = self.root.clone() else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = self.expanded.iter().cloned().collect();
        paths.sort();
        if !paths.contains(&root) {
            paths.insert(0, root);
        }
        paths
            .into_iter()
            .map(|path| FetchRequest {
                root_gen: self.root_gen,
                path,
                deep: false,
                expand_children: false,
            })
            .collect()
    }

    /// Admits an asynchronously produced listing. Stale listings (older root
    /// generation, or a directory collapsed while the listing was in flight)
    /// are discarded. Returns the follow-up fetches the listing triggers:
    /// already-expanded child directories for a `deep` listing, every child
    /// directory for an `expand_children` one.
    pub fn apply_listing(
        &mut self,
        root_gen: u64,
        path: &Path,
        entries: Vec<DirEntryInfo>,
        deep: bool,
        expand_children: bool,
    ) -> Vec<FetchRequest> {
        if root_gen != self.root_gen {
            return Vec::new();
        }
        let is_root = self.root.as_deref() == Some(path);
        if !is_root && !self.expanded.contains(path) {
            return Vec::new();
        }

        let entries = normalize(entries);

        let mut followups = Vec::new();
        for entry in entries.iter().filter(|e| e.is_directory) {
            if expand_children {
                self.expanded.insert(entry.path.clone());
                followups.push(FetchRequest {
                    root_gen: self.root_gen,
                    path: entry.path.clone(),
                    deep: false,
                    expand_children: true,
                });
            } else if deep && self.expanded.contains(&entry.path) {
                followups.push(FetchRequest {
                    root_gen: self.root_gen,
                    path: entry.path.clone(),
                    deep: true,
                    expand_children: false,
                });
            }
        }

        self.children.insert(path.to_path_buf(), TreeNode { entries });
        followups
    }
}

impl Default for FileTreeCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Listing order shown everywhere: hidden entries dropped, directories
/// first, then case-insensitive by name.
fn normalize(mut entries: Vec<DirEntryInfo>) -> Vec<DirEntryInfo> {
    entries.retain(|e| !e.name.starts_with('.'));
    entries.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    entries
}
