use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const UNKNOWN_LANGUAGE: &str = "Unknown";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub name: String,
    pub extensions: Vec<String>,
    pub priority: u32,
    pub enabled: bool,
}

impl LanguageInfo {
    fn new(name: &str, extensions: &[&str], priority: u32) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            priority,
            enabled: true,
        }
    }
}

/// TOML `[languages]` 區段的覆寫設定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageOverrides {
    pub disabled: Option<Vec<String>>,
    pub extensions: Option<BTreeMap<String, Vec<String>>>,
}

/// 副檔名到語言的註冊表, 以優先度決定共用副檔名的歸屬 (例如 .h)
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: BTreeMap<String, LanguageInfo>,
}

impl LanguageRegistry {
    pub fn with_defaults() -> Self {
        let defaults = [
            LanguageInfo::new("Python", &["py", "pyw", "pyi"], 100),
            LanguageInfo::new("JavaScript", &["js", "jsx", "mjs", "cjs"], 95),
            LanguageInfo::new("TypeScript", &["ts", "tsx"], 95),
            LanguageInfo::new("Rust", &["rs"], 90),
            LanguageInfo::new("Go", &["go"], 85),
            LanguageInfo::new("Java", &["java"], 80),
            LanguageInfo::new("C#", &["cs"], 80),
            LanguageInfo::new("Swift", &["swift"], 80),
            LanguageInfo::new("C++", &["cpp", "cc", "cxx", "hpp", "hh", "h"], 75),
            LanguageInfo::new("Kotlin", &["kt", "kts"], 75),
            LanguageInfo::new("Ruby", &["rb"], 75),
            LanguageInfo::new("C", &["c", "h"], 70),
            LanguageInfo::new("PHP", &["php"], 70),
            LanguageInfo::new("Perl", &["pl", "pm"], 70),
            LanguageInfo::new("Shell", &["sh", "bash"], 65),
            LanguageInfo::new("Assembly", &["s", "asm"], 65),
            LanguageInfo::new("HTML", &["html", "htm"], 60),
            LanguageInfo::new("CSS", &["css"], 60),
            LanguageInfo::new("SQL", &["sql"], 60),
            LanguageInfo::new("Markdown", &["md"], 40),
            LanguageInfo::new("JSON", &["json"], 40),
            LanguageInfo::new("YAML", &["yml", "yaml"], 40),
            LanguageInfo::new("TOML", &["toml"], 40),
        ];

        let mut languages = BTreeMap::new();
        for info in defaults {
            languages.insert(info.name.clone(), info);
        }

        Self { languages }
    }

    pub fn apply_overrides(&mut self, overrides: &LanguageOverrides) {
        if let Some(disabled) = &overrides.disabled {
            for name in disabled {
                if let Some(info) = self.languages.get_mut(name) {
                    info.enabled = false;
                }
            }
        }

        if let Some(extensions) = &overrides.extensions {
            for (name, exts) in extensions {
                if let Some(info) = self.languages.get_mut(name) {
                    info.extensions = exts.iter().map(|e| e.to_lowercase()).collect();
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&LanguageInfo> {
        self.languages.get(name)
    }

    /// 以副檔名解析語言, 高優先度獲勝; 同分時依名稱排序取第一個
    pub fn resolve_extension(&self, extension: &str) -> Option<&LanguageInfo> {
        let ext = extension.to_lowercase();
        let mut best: Option<&LanguageInfo> = None;

        for info in self.languages.values() {
            if !info.enabled || !info.extensions.iter().any(|e| e == &ext) {
                continue;
            }
            match best {
                Some(current) if current.priority >= info.priority => {}
                _ => best = Some(info),
            }
        }

        best
    }

    pub fn detect(&self, path: &Path) -> Option<&LanguageInfo> {
        let extension = path.extension().and_then(|e| e.to_str())?;
        self.resolve_extension(extension)
    }

    pub fn language_name(&self, path: &Path) -> String {
        self.detect(path)
            .map(|info| info.name.clone())
            .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string())
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
