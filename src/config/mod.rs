pub mod cli;
pub mod toml_config;

use crate::core::languages::{LanguageOverrides, LanguageRegistry};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AnalyzerError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use toml_config::TomlConfig;

pub const DEFAULT_OUTPUT_DIR: &str = "repo-analysis-output";
pub const DEFAULT_CONFIG_FILE: &str = "repo-analyzer.toml";
pub const DEFAULT_ARCHIVE_FILENAME: &str = "analysis-bundle-{timestamp}.zip";
pub const DEFAULT_OUTPUT_FORMATS: &[&str] = &["markdown", "json"];

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "repo-analyzer")]
#[command(about = "Analyze a repository and generate structure, summary, and dependency reports")]
pub struct CliConfig {
    #[arg(long, default_value = ".")]
    pub root: String,

    #[arg(long, help = "Explicit TOML config file path")]
    pub config: Option<String>,

    #[arg(long)]
    pub output_dir: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub include: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    #[arg(long)]
    pub max_depth: Option<usize>,

    #[arg(long, help = "Log planned writes without creating any files")]
    pub dry_run: bool,

    #[arg(long, help = "Bundle the generated reports into a zip archive")]
    pub archive: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

/// CLI 與 TOML 合併後的有效配置
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub root_path: String,
    pub output_dir: String,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub tree_exclude_patterns: Vec<String>,
    pub max_depth: Option<usize>,
    pub generate_tree_json: bool,
    pub output_formats: Vec<String>,
    pub archive_enabled: bool,
    pub archive_filename: String,
    pub archive_include_graph: bool,
    pub monitoring_enabled: bool,
    pub dry_run: bool,
    pub language_overrides: Option<LanguageOverrides>,
}

impl AnalyzerConfig {
    /// 載入配置檔並與 CLI 參數合併, 同時檢查輸出路徑是否越界
    pub fn from_cli(cli: &CliConfig) -> Result<Self> {
        let scan_root = std::path::absolute(&cli.root).map_err(AnalyzerError::IoError)?;
        let boundary = get_repository_root(&scan_root).unwrap_or_else(|| scan_root.clone());

        let file = load_config_file(cli, &boundary)?.unwrap_or_default();
        if let Some(analysis) = &file.analysis {
            tracing::debug!("Loaded analysis profile: {}", analysis.name);
        }

        let config = Self::merge(cli, file);
        validate_output_path(&config.output_dir, &boundary)?;
        Ok(config)
    }

    /// 合併優先序: CLI 參數 > 配置檔 > 預設值
    pub fn merge(cli: &CliConfig, file: TomlConfig) -> Self {
        let output_dir = cli
            .output_dir
            .clone()
            .or_else(|| file.output_dir().map(str::to_string))
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());

        let include_patterns = if !cli.include.is_empty() {
            cli.include.clone()
        } else {
            file.scan
                .as_ref()
                .and_then(|s| s.include_patterns.clone())
                .unwrap_or_default()
        };

        let exclude_patterns = if !cli.exclude.is_empty() {
            cli.exclude.clone()
        } else {
            file.scan
                .as_ref()
                .and_then(|s| s.exclude_patterns.clone())
                .unwrap_or_default()
        };

        let mut exclude_dirs = file
            .scan
            .as_ref()
            .and_then(|s| s.exclude_dirs.clone())
            .unwrap_or_default();
        let mut tree_exclude_patterns = file
            .tree
            .as_ref()
            .and_then(|t| t.exclude_patterns.clone())
            .unwrap_or_default();

        // 掃描不得進入輸出目錄, 以免把上一輪的報告當成源碼
        let output_name = Path::new(&output_dir)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| output_dir.clone());
        if !exclude_dirs.contains(&output_name) {
            exclude_dirs.push(output_name.clone());
        }
        if !tree_exclude_patterns.contains(&output_name) {
            tree_exclude_patterns.push(output_name);
        }

        let output_formats = file
            .output_formats()
            .map(|formats| formats.to_vec())
            .unwrap_or_else(|| {
                DEFAULT_OUTPUT_FORMATS
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            });

        Self {
            root_path: cli.root.clone(),
            output_dir,
            include_patterns,
            exclude_patterns,
            exclude_dirs,
            tree_exclude_patterns,
            max_depth: cli.max_depth.or_else(|| file.max_depth()),
            generate_tree_json: file.generate_tree_json(),
            output_formats,
            archive_enabled: cli.archive || file.archive_enabled(),
            archive_filename: file
                .archive_filename()
                .unwrap_or(DEFAULT_ARCHIVE_FILENAME)
                .to_string(),
            archive_include_graph: file.archive_include_graph(),
            monitoring_enabled: cli.monitor || file.monitoring_enabled(),
            dry_run: cli.dry_run,
            language_overrides: file.languages,
        }
    }

    /// 依覆寫設定建立語言註冊表
    pub fn language_registry(&self) -> LanguageRegistry {
        let mut registry = LanguageRegistry::with_defaults();
        if let Some(overrides) = &self.language_overrides {
            registry.apply_overrides(overrides);
        }
        registry
    }
}

impl ConfigProvider for AnalyzerConfig {
    fn root_path(&self) -> &str {
        &self.root_path
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn include_patterns(&self) -> &[String] {
        &self.include_patterns
    }

    fn exclude_patterns(&self) -> &[String] {
        &self.exclude_patterns
    }

    fn exclude_dirs(&self) -> &[String] {
        &self.exclude_dirs
    }

    fn tree_exclude_patterns(&self) -> &[String] {
        &self.tree_exclude_patterns
    }

    fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    fn generate_tree_json(&self) -> bool {
        self.generate_tree_json
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn archive_enabled(&self) -> bool {
        self.archive_enabled
    }

    fn archive_filename(&self) -> &str {
        &self.archive_filename
    }

    fn archive_include_graph(&self) -> bool {
        self.archive_include_graph
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Validate for AnalyzerConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("root", &self.root_path)?;
        validation::validate_path("output_dir", &self.output_dir)?;
        validation::validate_output_formats("output_formats", &self.output_formats)?;

        if let Some(depth) = self.max_depth {
            validation::validate_range("max_depth", depth, 1, 100)?;
        }
        for pattern in &self.include_patterns {
            validation::validate_glob_pattern("include_patterns", pattern)?;
        }
        for pattern in &self.exclude_patterns {
            validation::validate_glob_pattern("exclude_patterns", pattern)?;
        }
        for pattern in &self.tree_exclude_patterns {
            validation::validate_non_empty_string("tree_exclude_patterns", pattern)?;
        }
        if self.archive_enabled {
            validation::validate_non_empty_string("archive_filename", &self.archive_filename)?;
        }

        Ok(())
    }
}

/// 用 git 找出倉庫頂層目錄, 不在 git 倉庫內時回傳 None
pub fn get_repository_root(start: &Path) -> Option<PathBuf> {
    let output = std::process::Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(start)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let text = String::from_utf8(output.stdout).ok()?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

fn load_config_file(cli: &CliConfig, repo_root: &Path) -> Result<Option<TomlConfig>> {
    if let Some(path) = &cli.config {
        if !Path::new(path).exists() {
            return Err(AnalyzerError::ConfigError {
                message: format!("Config file not found: {}", path),
            });
        }
        tracing::debug!("Loading config from {}", path);
        return TomlConfig::from_file(path).map(Some);
    }

    let default_path = repo_root.join(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        tracing::debug!("Loading config from {}", default_path.display());
        return TomlConfig::from_file(&default_path).map(Some);
    }

    Ok(None)
}

/// 確認輸出目錄不會逃出邊界目錄 (相對路徑以邊界目錄為基準)
pub fn validate_output_path(output_dir: &str, boundary_root: &Path) -> Result<PathBuf> {
    validation::validate_path("output_dir", output_dir)?;

    let candidate = Path::new(output_dir);
    let resolved = if candidate.is_absolute() {
        normalize_path(candidate)
    } else {
        normalize_path(&boundary_root.join(candidate))
    };

    let boundary = normalize_path(boundary_root);
    if !resolved.starts_with(&boundary) {
        return Err(AnalyzerError::PathValidationError {
            path: output_dir.to_string(),
            reason: format!(
                "Output directory must stay inside {}",
                boundary.display()
            ),
        });
    }

    Ok(resolved)
}

// 純字面正規化, 輸出目錄在檢查時通常還不存在
fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::CurDir => {}
            other => result.push(other.as_os_str()),
        }
    }
    result
}
