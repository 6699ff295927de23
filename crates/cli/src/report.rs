use organizer_core::action_log::ActionStatus;
use organizer_core::pipeline::{PipelineMode, RunReport, RunSummary};

pub fn mode_label(mode: PipelineMode) -> &'static str {
    match mode {
        PipelineMode::Organize => "organize",
        PipelineMode::Reanalyze => "reanalyze",
    }
}

pub fn to_json(mode: PipelineMode, dry_run: bool, report: &RunReport) -> serde_json::Value {
    serde_json::json!({
        "status": "ok",
        "mode": mode_label(mode),
        "dry_run": dry_run,
        "summary": RunSummary::from_report(report),
        "actions": report.entries,
    })
}

pub fn render_text(mode: PipelineMode, dry_run: bool, report: &RunReport) -> String {
    let s = RunSummary::from_report(report);
    let mut out = String::new();
    let prefix = if dry_run { "[DRY RUN] " } else { "" };
    out.push_str(&format!(
        "{}{}: examined {}, actions {}, moved {}, simulated {}, failed {}\n",
        prefix,
        mode_label(mode),
        s.examined,
        s.actions,
        s.moved,
        s.simulated,
        s.failed
    ));
    if mode == PipelineMode::Reanalyze {
        out.push_str(&format!(
            "recategorized {}, renamed {}\n",
            s.recategorized, s.renamed
        ));
    }
    out.push_str(&format!(
        "names: ai {}, fallback {}\n",
        s.ai_named, s.fallback_named
    ));
    for entry in report
        .entries
        .iter()
        .filter(|e| e.status == ActionStatus::Failed)
    {
        out.push_str(&format!(
            "failed: {} ({})\n",
            entry.original_path,
            entry.error.as_deref().unwrap_or("unknown error")
        ));
    }
    out
}
