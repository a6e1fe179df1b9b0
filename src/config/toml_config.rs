use crate::core::languages::LanguageOverrides;
use crate::utils::error::{AnalyzerError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub analysis: Option<AnalysisSection>,
    pub scan: Option<ScanSection>,
    pub tree: Option<TreeSection>,
    pub report: Option<ReportSection>,
    pub languages: Option<LanguageOverrides>,
    pub monitoring: Option<MonitoringSection>,
    pub environment: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSection {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanSection {
    pub include_patterns: Option<Vec<String>>,
    pub exclude_patterns: Option<Vec<String>>,
    pub exclude_dirs: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeSection {
    pub exclude_patterns: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub generate_json: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSection {
    pub output_dir: Option<String>,
    pub formats: Option<Vec<String>>,
    pub archive: Option<ArchiveSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveSection {
    pub enabled: bool,
    pub filename: Option<String>,
    pub include_graph: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSection {
    pub enabled: bool,
    pub log_level: Option<String>,
    pub system_stats: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AnalyzerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AnalyzerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REPO_ANALYZER_OUTPUT})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        // 使用正規表達式匹配 ${VAR_NAME} 格式
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(scan) = &self.scan {
            for pattern in scan.include_patterns.iter().flatten() {
                crate::utils::validation::validate_glob_pattern("scan.include_patterns", pattern)?;
            }
            for pattern in scan.exclude_patterns.iter().flatten() {
                crate::utils::validation::validate_glob_pattern("scan.exclude_patterns", pattern)?;
            }
            for dir in scan.exclude_dirs.iter().flatten() {
                crate::utils::validation::validate_non_empty_string("scan.exclude_dirs", dir)?;
            }
        }

        if let Some(tree) = &self.tree {
            if let Some(depth) = tree.max_depth {
                crate::utils::validation::validate_range("tree.max_depth", depth, 1, 100)?;
            }
            for pattern in tree.exclude_patterns.iter().flatten() {
                crate::utils::validation::validate_non_empty_string(
                    "tree.exclude_patterns",
                    pattern,
                )?;
            }
        }

        if let Some(report) = &self.report {
            if let Some(dir) = &report.output_dir {
                crate::utils::validation::validate_path("report.output_dir", dir)?;
            }
            if let Some(formats) = &report.formats {
                crate::utils::validation::validate_output_formats("report.formats", formats)?;
            }
            if let Some(archive) = &report.archive {
                if archive.enabled {
                    if let Some(filename) = &archive.filename {
                        crate::utils::validation::validate_non_empty_string(
                            "report.archive.filename",
                            filename,
                        )?;
                    }
                }
            }
        }

        Ok(())
    }

    /// 取得輸出目錄 (未設定時回傳 None, 交由合併層補預設值)
    pub fn output_dir(&self) -> Option<&str> {
        self.report.as_ref()?.output_dir.as_deref()
    }

    /// 取得輸出格式清單
    pub fn output_formats(&self) -> Option<&[String]> {
        self.report.as_ref()?.formats.as_deref()
    }

    /// 取得目錄樹深度限制
    pub fn max_depth(&self) -> Option<usize> {
        self.tree.as_ref()?.max_depth
    }

    /// 是否產生 tree.json
    pub fn generate_tree_json(&self) -> bool {
        self.tree
            .as_ref()
            .and_then(|t| t.generate_json)
            .unwrap_or(true)
    }

    /// 是否啟用報告壓縮打包
    pub fn archive_enabled(&self) -> bool {
        self.report
            .as_ref()
            .and_then(|r| r.archive.as_ref())
            .map(|a| a.enabled)
            .unwrap_or(false)
    }

    /// 取得壓縮檔名 (支援 {timestamp} 佔位符)
    pub fn archive_filename(&self) -> Option<&str> {
        self.report.as_ref()?.archive.as_ref()?.filename.as_deref()
    }

    /// 壓縮包是否包含依賴圖報告
    pub fn archive_include_graph(&self) -> bool {
        self.report
            .as_ref()
            .and_then(|r| r.archive.as_ref())
            .and_then(|a| a.include_graph)
            .unwrap_or(true)
    }

    /// 取得語言覆寫設定
    pub fn language_overrides(&self) -> Option<&LanguageOverrides> {
        self.languages.as_ref()
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[analysis]
name = "demo-analysis"
description = "Demo repository analysis"
version = "1.0.0"

[scan]
include_patterns = ["*.py", "*.rs"]
exclude_dirs = ["target"]

[tree]
max_depth = 5

[report]
output_dir = "./analysis-output"
formats = ["markdown", "json"]

[environment]
RUST_LOG = "repo_analyzer=debug"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.analysis.as_ref().unwrap().name, "demo-analysis");
        assert_eq!(config.output_dir(), Some("./analysis-output"));
        assert_eq!(config.max_depth(), Some(5));
        assert_eq!(
            config.output_formats().unwrap(),
            &["markdown".to_string(), "json".to_string()]
        );
        assert!(config.generate_tree_json());
        assert!(!config.archive_enabled());
        assert_eq!(
            config.environment.as_ref().unwrap()["RUST_LOG"],
            "repo_analyzer=debug"
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert!(config.analysis.is_none());
        assert_eq!(config.output_dir(), None);
        assert_eq!(config.max_depth(), None);
        assert!(config.generate_tree_json());
        assert!(!config.archive_enabled());
        assert!(config.archive_include_graph());
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_ANALYSIS_OUTPUT", "./from-env");

        let toml_content = r#"
[report]
output_dir = "${TEST_ANALYSIS_OUTPUT}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_dir(), Some("./from-env"));

        std::env::remove_var("TEST_ANALYSIS_OUTPUT");
    }

    #[test]
    fn test_unknown_env_var_left_verbatim() {
        let toml_content = r#"
[report]
output_dir = "${REPO_ANALYZER_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_dir(), Some("${REPO_ANALYZER_UNSET_VARIABLE}"));
    }

    #[test]
    fn test_archive_section() {
        let toml_content = r#"
[report]
output_dir = "./out"
formats = ["markdown"]

[report.archive]
enabled = true
filename = "bundle-{timestamp}.zip"
include_graph = false
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert!(config.archive_enabled());
        assert_eq!(config.archive_filename(), Some("bundle-{timestamp}.zip"));
        assert!(!config.archive_include_graph());
    }

    #[test]
    fn test_language_overrides_section() {
        let toml_content = r#"
[languages]
disabled = ["Perl"]

[languages.extensions]
Python = ["py"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let overrides = config.language_overrides().unwrap();

        assert_eq!(overrides.disabled.as_ref().unwrap(), &["Perl".to_string()]);
        assert_eq!(
            overrides.extensions.as_ref().unwrap()["Python"],
            vec!["py".to_string()]
        );
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[report]
formats = ["xml"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_depth_out_of_range() {
        let toml_content = r#"
[tree]
max_depth = 0
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[analysis]
name = "file-test"

[report]
output_dir = "./output"
formats = ["csv"]
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.analysis.as_ref().unwrap().name, "file-test");
        assert_eq!(config.output_formats().unwrap(), &["csv".to_string()]);
    }
}
