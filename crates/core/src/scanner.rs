//! Finds the files a run is allowed to touch.

use crate::categories::{Category, ORGANIZED_PREFIX};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

pub const DEFAULT_IGNORE: &[&str] = &[
    ".DS_Store",
    ".localized",
    "Thumbs.db",
    "desktop.ini",
    ".Trashes",
    ".fseventsd",
];

#[derive(Debug, Clone)]
pub struct Scanner {
    ignore: GlobSet,
}

impl Scanner {
    pub fn new(ignore: &[String]) -> anyhow::Result<Self> {
        Ok(Self {
            ignore: build_globset(ignore)?,
        })
    }

    /// Hidden, symlinked and configured system files are never organized.
    pub fn is_system_file(&self, path: &Path) -> bool {
        let name = match path.file_name() {
            Some(n) => n.to_string_lossy(),
            None => return true,
        };
        if name.starts_with('.') || self.ignore.is_match(&*name) {
            return true;
        }
        path.symlink_metadata()
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    /// Regular top-level files of `folder`, sorted by name.
    pub fn eligible_files(&self, folder: &Path) -> Vec<PathBuf> {
        direct_children(folder)
            .filter(|e| e.file_type().is_file())
            .map(DirEntry::into_path)
            .filter(|p| !is_organized_name(p))
            .filter(|p| {
                let skip = self.is_system_file(p);
                if skip {
                    tracing::debug!("skipping system file {:?}", p);
                }
                !skip
            })
            .collect()
    }

    /// `Organized_<Label>` folders directly under `root`, sorted by name.
    pub fn organized_folders(&self, root: &Path) -> Vec<(Category, PathBuf)> {
        direct_children(root)
            .filter(|e| e.file_type().is_dir())
            .filter_map(|e| {
                let category = e.file_name().to_str().and_then(Category::from_folder_name)?;
                Some((category, e.into_path()))
            })
            .collect()
    }
}

fn direct_children(dir: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
}

fn is_organized_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with(ORGANIZED_PREFIX))
        .unwrap_or(false)
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
    }
    Ok(builder.build()?)
}
