//! Second pass over already organized folders: recategorize and rename.

use crate::action_log::{ActionKind, ActionLogEntry};
use crate::categories::Category;
use crate::classifier;
use crate::config::TargetFolderSet;
use crate::fs_apply;
use crate::pipeline::{build_entry, display_name, Organizer, RunReport};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

impl Organizer {
    pub async fn reanalyze(&mut self, targets: &TargetFolderSet) -> RunReport {
        info!("Starting file re-analysis ({})", self.mode_label());
        let mut report = RunReport::default();
        for folder in targets.iter() {
            info!("Re-analyzing {} folder", folder.name);
            // Snapshot first so files moved during the pass are not visited twice.
            let work = self.reanalysis_worklist(&folder.path);
            if work.is_empty() {
                info!("No organized files found in {:?}", folder.path);
                continue;
            }
            for (current, path) in work {
                report.examined += 1;
                if let Some(entry) = self.reanalyze_file(&folder.path, current, &path).await {
                    self.record(&entry);
                    report.entries.push(entry);
                }
            }
        }
        info!(
            "Re-analysis completed: {} of {} files changed",
            report.entries.len(),
            report.examined
        );
        report
    }

    fn reanalysis_worklist(&self, root: &Path) -> Vec<(Category, PathBuf)> {
        self.scanner
            .organized_folders(root)
            .into_iter()
            .flat_map(|(category, dir)| {
                self.scanner
                    .eligible_files(&dir)
                    .into_iter()
                    .map(move |file| (category, file))
            })
            .collect()
    }

    /// `None` when the file already sits where it belongs under the name it deserves.
    async fn reanalyze_file(
        &mut self,
        root: &Path,
        current: Category,
        path: &Path,
    ) -> Option<ActionLogEntry> {
        let classification = classifier::classify(path);
        let choice = self.choose_name(path, &classification).await;

        let dir = if classification.category == current {
            path.parent().map(Path::to_path_buf)?
        } else {
            fs_apply::category_dir(root, classification.category)
        };
        let target = self.ledger.resolve(&dir, &choice.file_name, Some(path));
        if target == path {
            debug!("No changes needed for {}", display_name(path));
            return None;
        }

        let mut changes = Vec::new();
        if classification.category != current {
            changes.push(format!("category: {} -> {}", current, classification.category));
        }
        let (old_name, new_name) = (display_name(path), display_name(&target));
        if old_name != new_name {
            changes.push(format!("name: {} -> {}", old_name, new_name));
        }
        info!("Re-analyzing {}: {}", old_name, changes.join(", "));

        let moved = self.mover.move_to(path, &target);
        let outcome = self.settle(path, &target, moved);
        let mut entry = build_entry(
            ActionKind::Reanalysis,
            path,
            &target,
            classification,
            &choice,
            outcome,
        );
        entry.original_category = Some(current);
        entry.changes = changes;
        Some(entry)
    }
}
