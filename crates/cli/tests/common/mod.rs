#![allow(dead_code)]

use organizer_core::config::{AppConfig, TargetFolder, TargetFolderSet};
use providers::{LlmProvider, ProviderError, Suggestion};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use walkdir::WalkDir;

/// Config that keeps every log inside the test's temp dir and never calls out.
pub fn test_config(temp: &Path) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.logging.dir = Some(temp.join("logs").to_string_lossy().into_owned());
    cfg.ai.enabled = false;
    cfg.ai.timeout_secs = 1;
    cfg
}

pub fn targets(temp: &Path, names: &[&str]) -> TargetFolderSet {
    TargetFolderSet::new(
        names
            .iter()
            .map(|n| TargetFolder {
                name: n.to_string(),
                path: temp.join(n),
            })
            .collect(),
    )
}

/// Every file under `root`, relative and sorted.
pub fn tree(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Minimal JPEG: SOI, one APP1 Exif segment with ASCII IFD0 tags, EOI.
pub fn exif_jpeg(make: &str, model: &str, date: &str) -> Vec<u8> {
    let tags = [(0x010Fu16, make), (0x0110, model), (0x0132, date)];
    let data_start = 8 + 2 + tags.len() * 12 + 4;
    let mut tiff = b"II\x2a\x00\x08\x00\x00\x00".to_vec();
    let mut data = Vec::new();
    tiff.extend_from_slice(&(tags.len() as u16).to_le_bytes());
    for (tag, value) in tags {
        let bytes = format!("{}\0", value).into_bytes();
        tiff.extend_from_slice(&tag.to_le_bytes());
        tiff.extend_from_slice(&2u16.to_le_bytes());
        tiff.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        tiff.extend_from_slice(&((data_start + data.len()) as u32).to_le_bytes());
        data.extend_from_slice(&bytes);
    }
    tiff.extend_from_slice(&0u32.to_le_bytes());
    tiff.extend_from_slice(&data);

    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    jpeg.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}

/// Provider that answers every prompt the same way, optionally after a delay.
pub struct Scripted {
    pub reply: Result<String, fn() -> ProviderError>,
    pub delay: Duration,
    pub calls: AtomicUsize,
}

impl Scripted {
    pub fn answering(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn slow(text: &str, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::answering(text)
        }
    }

    pub fn failing(err: fn() -> ProviderError) -> Self {
        Self {
            reply: Err(err),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LlmProvider for Scripted {
    async fn suggest(&self, _prompt: &str) -> Result<Suggestion, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        match &self.reply {
            Ok(text) => Ok(Suggestion {
                text: text.clone(),
                model: Some("scripted".into()),
            }),
            Err(make) => Err(make()),
        }
    }
}
