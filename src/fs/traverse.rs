//! Recursive directory listing with filters, pruning, depth limits and early exit.
//!
//! [`list`] and [`list_sync`] walk a tree with an explicit work stack. Within one
//! directory, children are examined in sorted order and all of them are
//! filtered before any subdirectory is entered; subdirectories are then entered
//! in sorted order. The final result is sorted regardless, so the visiting order
//! only matters for [`TraversalOptions::stop_on_first_match`].
//!
//! Filtering and descent are independent decisions. A directory rejected by the
//! include/exclude patterns is still walked, and a pruned directory is still
//! reported.
//!
//! Patterns are unanchored regular expressions matched against the path
//! relative to the root, rendered with `/` separators on every platform, so a
//! pattern like `src/app` can match nested structure.
//!
//! # Examples
//!
//! ```rust,no_run
//! use regex::Regex;
//! use sturdyfs::fs::{EntityFilter, TraversalOptions, list};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let options = TraversalOptions::new()
//!     .recurse(true)
//!     .entities(EntityFilter::Files)
//!     .include(Regex::new(r"\.rs$")?)
//!     .prune(Regex::new(r"(^|/)target$")?);
//!
//! for path in list("crates", &options).await? {
//!     println!("{}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

use crate::core::file_error::{FileOperation, file_error};
use crate::core::{FsError, Result};
use crate::fs::probe::{EntityKind, exists, exists_sync, probe, probe_sync};
use regex::Regex;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Which kinds of entries to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityFilter {
    /// Files only
    Files,
    /// Directories only
    Directories,
    /// Both
    #[default]
    All,
}

impl EntityFilter {
    fn admits(self, kind: EntityKind) -> bool {
        match self {
            EntityFilter::Files => kind == EntityKind::File,
            EntityFilter::Directories => kind == EntityKind::Directory,
            EntityFilter::All => kind.exists(),
        }
    }
}

/// What to do after a directory could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalAction {
    /// Treat the directory as empty and keep walking.
    Continue,
    /// Stop the whole listing and return the error.
    Abort,
}

/// Callback consulted when reading a directory fails.
pub type TraversalErrorHandler = Arc<dyn Fn(&Path, &io::Error) -> TraversalAction + Send + Sync>;

/// Options for [`list`] and [`list_sync`].
///
/// Build with the chained setters:
///
/// ```rust
/// use sturdyfs::fs::TraversalOptions;
///
/// let options = TraversalOptions::new().recurse(true).max_depth(2);
/// assert!(options.recurse);
/// assert_eq!(options.max_depth, Some(2));
/// ```
#[derive(Clone, Default)]
pub struct TraversalOptions {
    /// Return absolute paths instead of paths relative to the root.
    pub full_paths: bool,
    /// Descend into subdirectories.
    pub recurse: bool,
    /// Entity kinds to report.
    pub entities: EntityFilter,
    /// Report only entries matching at least one of these (empty = all).
    pub include: Vec<Regex>,
    /// Never report entries matching any of these.
    pub exclude: Vec<Regex>,
    /// Report but never descend into directories matching any of these.
    pub prune: Vec<Regex>,
    /// Deepest level to report; the root's children are level 1.
    pub max_depth: Option<usize>,
    /// Return as soon as one entry is accepted.
    pub stop_on_first_match: bool,
    /// Fail instead of returning nothing when the root does not exist.
    pub throw_on_missing_root: bool,
    /// Decides whether an unreadable directory aborts the listing.
    pub on_error: Option<TraversalErrorHandler>,
}

impl std::fmt::Debug for TraversalOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraversalOptions")
            .field("full_paths", &self.full_paths)
            .field("recurse", &self.recurse)
            .field("entities", &self.entities)
            .field("include", &self.include)
            .field("exclude", &self.exclude)
            .field("prune", &self.prune)
            .field("max_depth", &self.max_depth)
            .field("stop_on_first_match", &self.stop_on_first_match)
            .field("throw_on_missing_root", &self.throw_on_missing_root)
            .field("on_error", &self.on_error.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

impl TraversalOptions {
    /// Defaults: relative paths, no recursion, all entities, no filters.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn full_paths(mut self, full_paths: bool) -> Self {
        self.full_paths = full_paths;
        self
    }

    #[must_use]
    pub fn recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    #[must_use]
    pub fn entities(mut self, entities: EntityFilter) -> Self {
        self.entities = entities;
        self
    }

    /// Add an include pattern. Include patterns are OR-combined.
    #[must_use]
    pub fn include(mut self, pattern: Regex) -> Self {
        self.include.push(pattern);
        self
    }

    /// Add an exclude pattern. Any exclude match rejects the entry.
    #[must_use]
    pub fn exclude(mut self, pattern: Regex) -> Self {
        self.exclude.push(pattern);
        self
    }

    /// Add a prune pattern.
    #[must_use]
    pub fn prune(mut self, pattern: Regex) -> Self {
        self.prune.push(pattern);
        self
    }

    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    #[must_use]
    pub fn stop_on_first_match(mut self, stop: bool) -> Self {
        self.stop_on_first_match = stop;
        self
    }

    #[must_use]
    pub fn throw_on_missing_root(mut self, throw: bool) -> Self {
        self.throw_on_missing_root = throw;
        self
    }

    /// Install the unreadable-directory handler.
    #[must_use]
    pub fn on_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Path, &io::Error) -> TraversalAction + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(handler));
        self
    }
}

/// A directory waiting to be read, with its level below the root.
struct Frame {
    dir: PathBuf,
    depth: usize,
}

/// A child as returned by `read_dir`, before probing.
struct Child {
    name: OsString,
    is_symlink: bool,
}

/// The outcome of inspecting one child.
struct Visit {
    accepted: bool,
    descend: bool,
}

/// Filter and descent decisions shared by the async and blocking walkers.
struct Walk<'a> {
    root: &'a Path,
    options: &'a TraversalOptions,
}

impl<'a> Walk<'a> {
    fn new(root: &'a Path, options: &'a TraversalOptions) -> Self {
        Self {
            root,
            options,
        }
    }

    fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn visit(&self, path: &Path, child: &Child, kind: EntityKind, depth: usize) -> Visit {
        // a dangling link is still an entry; the link itself is a file
        let kind = match kind {
            EntityKind::Absent if child.is_symlink => EntityKind::File,
            kind => kind,
        };
        // vanished between read_dir and stat
        if kind == EntityKind::Absent {
            return Visit {
                accepted: false,
                descend: false,
            };
        }

        let opts = self.options;
        let rel = self.relative(path);

        let matched = opts.include.is_empty() || opts.include.iter().any(|re| re.is_match(&rel));
        let excluded = opts.exclude.iter().any(|re| re.is_match(&rel));
        let accepted = opts.entities.admits(kind) && matched && !excluded;

        let within_depth = opts.max_depth.is_none_or(|max| depth < max);
        let descend = opts.recurse
            && kind == EntityKind::Directory
            && !child.is_symlink
            && within_depth
            && !opts.prune.iter().any(|re| re.is_match(&rel));

        if descend {
            tracing::trace!(target: "fs::list", "descending into {rel}");
        }

        Visit {
            accepted,
            descend,
        }
    }

    fn visible(&self, depth: usize) -> bool {
        self.options.max_depth.is_none_or(|max| depth <= max)
    }

    /// Route a directory read failure through the handler.
    ///
    /// A directory that disappeared after it was probed is skipped quietly,
    /// unless it is a root the caller required to exist.
    fn read_failed(&self, frame: &Frame, error: io::Error) -> Result<()> {
        let dir = frame.dir.as_path();
        let optional = frame.depth > 0 || !self.options.throw_on_missing_root;
        if optional && error.kind() == io::ErrorKind::NotFound {
            tracing::debug!(target: "fs::list", "{} vanished during listing", dir.display());
            return Ok(());
        }
        let action = self.options.on_error.as_ref().map(|handler| handler(dir, &error));
        if action == Some(TraversalAction::Continue) {
            tracing::debug!(
                target: "fs::list",
                "skipping unreadable directory {}: {error}",
                dir.display()
            );
            return Ok(());
        }
        Err(FsError::Traversal {
            path: dir.to_path_buf(),
            source: error,
        })
    }

    fn finish(&self, mut found: Vec<PathBuf>) -> Vec<PathBuf> {
        found.sort();
        if self.options.full_paths {
            return found;
        }
        found
            .into_iter()
            .map(|p| match p.strip_prefix(self.root) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => p,
            })
            .collect()
    }
}

fn resolve_root(root: &Path) -> Result<PathBuf> {
    std::path::absolute(root).map_err(|e| {
        file_error(FileOperation::Resolve, root, "resolving traversal root", "fs::traverse::list", e)
            .into()
    })
}

fn sort_children(children: &mut [Child]) {
    children.sort_by(|a, b| a.name.cmp(&b.name));
}

async fn read_children(dir: &Path) -> io::Result<Vec<Child>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut children = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let is_symlink = entry.file_type().await.is_ok_and(|t| t.is_symlink());
        children.push(Child {
            name: entry.file_name(),
            is_symlink,
        });
    }
    sort_children(&mut children);
    Ok(children)
}

fn read_children_sync(dir: &Path) -> io::Result<Vec<Child>> {
    let mut children = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let is_symlink = entry.file_type().is_ok_and(|t| t.is_symlink());
        children.push(Child {
            name: entry.file_name(),
            is_symlink,
        });
    }
    sort_children(&mut children);
    Ok(children)
}

/// List the entries under `root`.
///
/// Returns an empty list for a missing root unless
/// [`TraversalOptions::throw_on_missing_root`] is set. Symlinks are reported
/// by the kind of their target but never descended into, which keeps link
/// cycles from looping.
///
/// # Errors
///
/// [`FsError::Traversal`] when a directory cannot be read and no handler chose
/// to continue.
pub async fn list(root: impl AsRef<Path>, options: &TraversalOptions) -> Result<Vec<PathBuf>> {
    let root = resolve_root(root.as_ref())?;
    if !options.throw_on_missing_root && !exists(&root).await {
        tracing::debug!(target: "fs::list", "root {} does not exist", root.display());
        return Ok(Vec::new());
    }

    let walk = Walk::new(&root, options);
    let mut found = Vec::new();
    let mut stack = vec![Frame {
        dir: root.clone(),
        depth: 0,
    }];

    while let Some(frame) = stack.pop() {
        let depth = frame.depth + 1;
        if !walk.visible(depth) {
            continue;
        }
        let children = match read_children(&frame.dir).await {
            Ok(children) => children,
            Err(e) => {
                walk.read_failed(&frame, e)?;
                continue;
            }
        };

        let mut subdirs = Vec::new();
        for child in &children {
            let path = frame.dir.join(&child.name);
            let kind = probe(&path).await;
            let visit = walk.visit(&path, child, kind, depth);
            if visit.accepted {
                if options.stop_on_first_match {
                    return Ok(walk.finish(vec![path]));
                }
                found.push(path.clone());
            }
            if visit.descend {
                subdirs.push(Frame {
                    dir: path,
                    depth,
                });
            }
        }
        stack.extend(subdirs.into_iter().rev());
    }

    Ok(walk.finish(found))
}

/// Blocking mirror of [`list`].
pub fn list_sync(root: impl AsRef<Path>, options: &TraversalOptions) -> Result<Vec<PathBuf>> {
    let root = resolve_root(root.as_ref())?;
    if !options.throw_on_missing_root && !exists_sync(&root) {
        tracing::debug!(target: "fs::list", "root {} does not exist", root.display());
        return Ok(Vec::new());
    }

    let walk = Walk::new(&root, options);
    let mut found = Vec::new();
    let mut stack = vec![Frame {
        dir: root.clone(),
        depth: 0,
    }];

    while let Some(frame) = stack.pop() {
        let depth = frame.depth + 1;
        if !walk.visible(depth) {
            continue;
        }
        let children = match read_children_sync(&frame.dir) {
            Ok(children) => children,
            Err(e) => {
                walk.read_failed(&frame, e)?;
                continue;
            }
        };

        let mut subdirs = Vec::new();
        for child in &children {
            let path = frame.dir.join(&child.name);
            let kind = probe_sync(&path);
            let visit = walk.visit(&path, child, kind, depth);
            if visit.accepted {
                if options.stop_on_first_match {
                    return Ok(walk.finish(vec![path]));
                }
                found.push(path.clone());
            }
            if visit.descend {
                subdirs.push(Frame {
                    dir: path,
                    depth,
                });
            }
        }
        stack.extend(subdirs.into_iter().rev());
    }

    Ok(walk.finish(found))
}
