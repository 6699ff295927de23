//! Filesystem side of the pipeline: the only place files are moved.

use crate::categories::Category;
use crate::error::MoveError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub fn category_dir(root: &Path, category: Category) -> PathBuf {
    root.join(category.folder_name())
}

pub fn destination_for(root: &Path, category: Category, final_name: &str) -> PathBuf {
    category_dir(root, category).join(final_name)
}

#[derive(Debug, Clone, Copy)]
pub struct Mover {
    pub dry_run: bool,
    /// Fall back to copy + remove when `rename` fails, e.g. across devices.
    pub copy_fallback: bool,
}

impl Mover {
    pub fn new(dry_run: bool, copy_fallback: bool) -> Self {
        Self {
            dry_run,
            copy_fallback,
        }
    }

    /// Moves `from` into `<root>/Organized_<category>/<final_name>`.
    pub fn relocate(
        &self,
        from: &Path,
        root: &Path,
        category: Category,
        final_name: &str,
    ) -> Result<PathBuf, MoveError> {
        let to = destination_for(root, category, final_name);
        self.move_to(from, &to)?;
        Ok(to)
    }

    /// Moves `from` to exactly `to`; a dry run only reports `to`.
    pub fn move_to(&self, from: &Path, to: &Path) -> Result<(), MoveError> {
        if self.dry_run {
            return Ok(());
        }
        if from == to {
            return Ok(());
        }
        if !from.exists() {
            return Err(MoveError::SourceMissing(from.to_path_buf()));
        }
        if to.exists() {
            return Err(MoveError::DestinationExists(to.to_path_buf()));
        }
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|source| MoveError::Io {
                op: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }

        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(e) if self.copy_fallback && from.exists() => {
                debug!("rename {:?} failed ({}), copying instead", from, e);
                copy_then_remove(from, to)
            }
            Err(source) => Err(MoveError::Io {
                op: "rename",
                path: from.to_path_buf(),
                source,
            }),
        }
    }
}

fn copy_then_remove(from: &Path, to: &Path) -> Result<(), MoveError> {
    if let Err(source) = fs::copy(from, to) {
        let _ = fs::remove_file(to);
        return Err(MoveError::Io {
            op: "copy",
            path: from.to_path_buf(),
            source,
        });
    }
    // The copy is complete; the source may go.
    if let Err(source) = fs::remove_file(from) {
        warn!("copied {:?} but could not remove the original", from);
        let _ = fs::remove_file(to);
        return Err(MoveError::Io {
            op: "remove",
            path: from.to_path_buf(),
            source,
        });
    }
    Ok(())
}
