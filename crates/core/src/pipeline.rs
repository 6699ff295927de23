//! Organize pipeline: scan -> classify -> suggest -> name -> move -> log.

use crate::action_log::{ActionKind, ActionLogEntry, ActionLogger, ActionStatus};
use crate::classifier::{self, Classification};
use crate::config::{AiConfig, AppConfig, TargetFolderSet};
use crate::error::MoveError;
use crate::extractor;
use crate::fs_apply::{self, Mover};
use crate::naming::{self, NameChoice, NameSource, NamingInput, PathLedger};
use crate::scanner::Scanner;
use crate::suggester::{NameSuggester, SuggestionOutcome};
use providers::credentials::validate_api_key;
use providers::noop::NoopProvider;
use providers::openai::{OpenAiConfig, OpenAiProvider};
use providers::LlmProvider;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    Organize,
    Reanalyze,
}

/// Entries of one run, in the order the files were handled.
#[derive(Debug, Default, Clone)]
pub struct RunReport {
    /// Files looked at, including those that needed no action.
    pub examined: usize,
    pub entries: Vec<ActionLogEntry>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub examined: usize,
    pub actions: usize,
    pub moved: usize,
    pub simulated: usize,
    pub failed: usize,
    pub recategorized: usize,
    pub renamed: usize,
    pub ai_named: usize,
    pub fallback_named: usize,
}

impl RunSummary {
    pub fn from_report(report: &RunReport) -> Self {
        let mut summary = RunSummary {
            examined: report.examined,
            actions: report.entries.len(),
            ..Default::default()
        };
        for entry in &report.entries {
            match entry.status {
                ActionStatus::Moved => summary.moved += 1,
                ActionStatus::Simulated => summary.simulated += 1,
                ActionStatus::Failed => summary.failed += 1,
            }
            match entry.naming {
                NameSource::Ai => summary.ai_named += 1,
                NameSource::Fallback => summary.fallback_named += 1,
            }
            if entry.action == ActionKind::Reanalysis {
                if entry.original_category.is_some_and(|c| c != entry.category) {
                    summary.recategorized += 1;
                }
                if entry.original_name != entry.new_name {
                    summary.renamed += 1;
                }
            }
        }
        summary
    }
}

pub struct Organizer {
    pub(crate) scanner: Scanner,
    pub(crate) suggester: NameSuggester,
    pub(crate) mover: Mover,
    pub(crate) ledger: PathLedger,
    pub(crate) logger: ActionLogger,
    pub(crate) max_name_len: usize,
    pub(crate) preview_chars: usize,
}

impl Organizer {
    pub fn new(
        config: &AppConfig,
        provider: Arc<dyn LlmProvider>,
        dry_run: bool,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            scanner: Scanner::new(&config.organize.ignore)?,
            suggester: NameSuggester::new(provider, config.ai.timeout()),
            mover: Mover::new(dry_run, config.organize.copy_fallback),
            ledger: PathLedger::new(),
            logger: ActionLogger::new(&config.log_dir()?)?,
            max_name_len: config.ai.max_name_len,
            preview_chars: config.ai.preview_chars,
        })
    }

    pub fn is_dry_run(&self) -> bool {
        self.mover.dry_run
    }

    pub(crate) fn mode_label(&self) -> &'static str {
        if self.is_dry_run() {
            "DRY RUN"
        } else {
            "LIVE"
        }
    }

    pub async fn run(&mut self, targets: &TargetFolderSet, mode: PipelineMode) -> RunReport {
        match mode {
            PipelineMode::Organize => self.organize(targets).await,
            PipelineMode::Reanalyze => self.reanalyze(targets).await,
        }
    }

    pub async fn organize(&mut self, targets: &TargetFolderSet) -> RunReport {
        info!("Starting file organization ({})", self.mode_label());
        let mut report = RunReport::default();
        for folder in targets.iter() {
            info!("Processing {} folder", folder.name);
            let folder_report = self.organize_folder(&folder.path).await;
            report.examined += folder_report.examined;
            report.entries.extend(folder_report.entries);
        }
        info!("File organization completed: {} actions", report.entries.len());
        report
    }

    pub async fn organize_folder(&mut self, root: &Path) -> RunReport {
        let mut report = RunReport::default();
        if !root.is_dir() {
            warn!("Folder does not exist: {:?}", root);
            return report;
        }

        let files = self.scanner.eligible_files(root);
        info!("Found {} files to process in {:?}", files.len(), root);
        for path in files {
            report.examined += 1;
            let entry = self.organize_file(root, &path).await;
            self.record(&entry);
            report.entries.push(entry);
        }
        report
    }

    async fn organize_file(&mut self, root: &Path, path: &Path) -> ActionLogEntry {
        let classification = classifier::classify(path);
        info!(
            "Processing: {} (type: {}, category: {})",
            display_name(path),
            classification.mime_type,
            classification.category
        );

        let choice = self.choose_name(path, &classification).await;
        let dir = fs_apply::category_dir(root, classification.category);
        let target = self.ledger.resolve(&dir, &choice.file_name, None);
        let moved = self
            .mover
            .relocate(path, root, classification.category, &display_name(&target))
            .map(|_| ());
        let outcome = self.settle(path, &target, moved);
        build_entry(
            ActionKind::Organize,
            path,
            &target,
            classification,
            &choice,
            outcome,
        )
    }

    /// Reads a preview, asks the suggester, and falls back when needed.
    pub(crate) async fn choose_name(
        &mut self,
        path: &Path,
        classification: &Classification,
    ) -> NameChoice {
        let content = extractor::read_content_preview(path, self.preview_chars);
        let outcome = self.suggester.suggest(path, &content).await;
        let input = NamingInput {
            path,
            category: classification.category,
            metadata: &classification.metadata,
            content: &content,
        };
        let mut choice = naming::name_for(&input, outcome.suggestion(), self.max_name_len);
        if let SuggestionOutcome::Unavailable(reason) = &outcome {
            choice.note = Some(format!("ai naming unavailable ({}); fallback name used", reason));
        }
        choice
    }

    /// Books the attempted move in the ledger. A failed target stays claimed so
    /// later files pick the same names a dry run would have picked.
    pub(crate) fn settle(
        &mut self,
        from: &Path,
        to: &Path,
        moved: Result<(), MoveError>,
    ) -> Result<ActionStatus, MoveError> {
        if let Err(e) = moved {
            self.ledger.claim(to);
            return Err(e);
        }
        self.ledger.record_move(from, to);
        if self.is_dry_run() {
            info!("[DRY RUN] Would move: {} -> {:?}", display_name(from), to);
            Ok(ActionStatus::Simulated)
        } else {
            info!("Moved: {} -> {:?}", display_name(from), to);
            Ok(ActionStatus::Moved)
        }
    }

    pub(crate) fn record(&self, entry: &ActionLogEntry) {
        if let Err(e) = self.logger.record(entry) {
            warn!("could not write action log: {:#}", e);
        }
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub(crate) fn build_entry(
    action: ActionKind,
    from: &Path,
    to: &Path,
    classification: Classification,
    choice: &NameChoice,
    outcome: Result<ActionStatus, MoveError>,
) -> ActionLogEntry {
    let (status, error) = match outcome {
        Ok(status) => (status, None),
        Err(e) => {
            error!("Error processing {}: {}", display_name(from), e);
            (ActionStatus::Failed, Some(e.to_string()))
        }
    };
    ActionLogEntry {
        action,
        status,
        original_path: from.to_string_lossy().into_owned(),
        new_path: to.to_string_lossy().into_owned(),
        original_name: display_name(from),
        new_name: display_name(to),
        category: classification.category,
        original_category: None,
        changes: Vec::new(),
        mime_type: classification.mime_type,
        metadata: classification.metadata,
        naming: choice.source,
        note: choice.note.clone(),
        error,
        timestamp: chrono::Local::now().to_rfc3339(),
    }
}

/// Explicit flag, then config file, then `OPENAI_API_KEY`.
pub fn resolve_api_key(flag: Option<&str>, ai: &AiConfig) -> Option<String> {
    flag.map(str::to_string)
        .or_else(|| ai.api_key.clone())
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .filter(|k| !k.trim().is_empty())
}

/// Real provider when AI is enabled and the key looks right, otherwise the no-op one.
pub fn build_provider(ai: &AiConfig, api_key: Option<&str>) -> Arc<dyn LlmProvider> {
    if !ai.enabled {
        info!("AI analysis disabled");
        return Arc::new(NoopProvider);
    }
    let raw = match api_key {
        Some(k) => k,
        None => {
            warn!("No OpenAI API key available; files will be named from metadata only");
            return Arc::new(NoopProvider);
        }
    };
    let (key, kind) = match validate_api_key(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!("{}; AI features disabled", e);
            return Arc::new(NoopProvider);
        }
    };
    match OpenAiProvider::new(OpenAiConfig {
        api_key: key,
        base_url: ai.base_url.clone(),
        chat_model: ai.model.clone(),
        timeout: ai.timeout(),
    }) {
        Ok(provider) => {
            debug!("OpenAI client initialized with {} key", kind.label());
            Arc::new(provider)
        }
        Err(e) => {
            error!("Failed to initialize OpenAI client: {}", e);
            Arc::new(NoopProvider)
        }
    }
}
