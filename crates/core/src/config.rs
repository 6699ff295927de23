use crate::error::ConfigError;
use crate::naming::DEFAULT_MAX_NAME_LEN;
use crate::scanner::DEFAULT_IGNORE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub folders: Vec<FolderConfig>,
    pub logging: LogConfig,
    pub ai: AiConfig,
    pub organize: OrganizeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderConfig {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Defaults to `~/FileOrganizer_Logs`.
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_name_len: usize,
    pub preview_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizeConfig {
    pub ignore: Vec<String>,
    pub copy_fallback: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            folders: ["Desktop", "Downloads", "Documents"]
                .into_iter()
                .map(|name| FolderConfig {
                    name: name.to_string(),
                    path: format!("~/{}", name),
                })
                .collect(),
            logging: LogConfig::default(),
            ai: AiConfig::default(),
            organize: OrganizeConfig::default(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            timeout_secs: 20,
            max_name_len: DEFAULT_MAX_NAME_LEN,
            preview_chars: 1000,
        }
    }
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for OrganizeConfig {
    fn default() -> Self {
        Self {
            ignore: DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect(),
            copy_fallback: true,
        }
    }
}

impl AppConfig {
    pub fn log_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.logging.dir {
            Some(dir) => expand_home(dir),
            None => Ok(home_dir()?.join("FileOrganizer_Logs")),
        }
    }

    pub fn target_folders(&self) -> Result<TargetFolderSet, ConfigError> {
        let folders = self
            .folders
            .iter()
            .map(|f| {
                Ok(TargetFolder {
                    name: f.name.clone(),
                    path: expand_home(&f.path)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(TargetFolderSet { folders })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFolder {
    pub name: String,
    pub path: PathBuf,
}

/// Ordered, fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFolderSet {
    folders: Vec<TargetFolder>,
}

impl TargetFolderSet {
    pub fn new(folders: Vec<TargetFolder>) -> Self {
        Self { folders }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetFolder> {
        self.folders.iter()
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Keeps only the named folders, preserving configured order.
    pub fn select(&self, names: &[String]) -> Result<Self, ConfigError> {
        if names.is_empty() {
            return Ok(self.clone());
        }
        for name in names {
            if !self.folders.iter().any(|f| &f.name == name) {
                let known: Vec<&str> = self.folders.iter().map(|f| f.name.as_str()).collect();
                return Err(ConfigError::UnknownFolder(name.clone(), known.join(", ")));
            }
        }
        Ok(Self {
            folders: self
                .folders
                .iter()
                .filter(|f| names.contains(&f.name))
                .cloned()
                .collect(),
        })
    }

    /// Drops folders that do not exist; fails when nothing is left.
    pub fn existing(self) -> Result<Self, ConfigError> {
        let folders: Vec<TargetFolder> = self
            .folders
            .into_iter()
            .filter(|f| {
                let ok = f.path.is_dir();
                if !ok {
                    tracing::warn!("folder does not exist: {:?}", f.path);
                }
                ok
            })
            .collect();
        if folders.is_empty() {
            return Err(ConfigError::NoTargetFolders);
        }
        Ok(Self { folders })
    }
}

fn home_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::NoHomeDir)
}

pub fn expand_home(path: &str) -> Result<PathBuf, ConfigError> {
    if path == "~" {
        return home_dir();
    }
    match path.strip_prefix("~/") {
        Some(rest) => Ok(home_dir()?.join(rest)),
        None => Ok(Path::new(path).to_path_buf()),
    }
}

pub fn load(path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
