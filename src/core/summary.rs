use crate::domain::model::{FileSummary, Metrics};
use std::path::Path;

const TEST_DIR_NAMES: &[&str] = &["test", "tests", "__tests__", "spec"];
const ENTRY_POINT_STEMS: &[&str] = &["main", "index", "app"];
const UTILITY_STEMS: &[&str] = &["utils", "util", "helpers", "helper"];
const CONFIG_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "toml", "ini", "cfg", "conf"];
const HEADER_EXTENSIONS: &[&str] = &["h", "hpp", "hh"];
const COMPONENT_EXTENSIONS: &[&str] = &["tsx", "jsx", "vue"];

pub fn summarize_file(rel_path: &Path, language: &str, content: &str) -> FileSummary {
    let (role, role_justification) = detect_role(rel_path);
    let summary = heuristic_summary(rel_path, language, &role);

    FileSummary {
        path: rel_path.to_string_lossy().into_owned(),
        language: language.to_string(),
        role,
        role_justification,
        summary,
        metrics: compute_metrics(content),
        symbols: None,
    }
}

/// 以檔名與路徑慣例判斷角色, 第一個命中的規則獲勝
fn detect_role(rel_path: &Path) -> (String, String) {
    let file_name = rel_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = rel_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem_lower = stem.to_lowercase();
    let extension = rel_path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    // 只認 test_ 前綴與整字 test, 避免誤判 testament.py 這類名稱
    if stem_lower.starts_with("test_") || stem_lower == "test" {
        return (
            "test".to_string(),
            format!("File name '{}' carries a test prefix", file_name),
        );
    }
    if stem_lower.ends_with("_test") || stem_lower.ends_with(".test") || stem.ends_with("Tests") {
        return (
            "test".to_string(),
            format!("File name '{}' carries a test suffix", file_name),
        );
    }
    if let Some(dir) = rel_path.parent() {
        for component in dir.components() {
            let name = component.as_os_str().to_string_lossy().to_lowercase();
            if TEST_DIR_NAMES.contains(&name.as_str()) {
                return (
                    "test".to_string(),
                    format!("Located in a '{}' directory", name),
                );
            }
        }
    }
    if ENTRY_POINT_STEMS.contains(&stem_lower.as_str()) {
        return (
            "entry_point".to_string(),
            format!("File name '{}' is a conventional entry point", file_name),
        );
    }
    if stem_lower == "cli" {
        return (
            "cli".to_string(),
            "File name marks the command-line interface module".to_string(),
        );
    }
    if UTILITY_STEMS.contains(&stem_lower.as_str()) {
        return (
            "utility".to_string(),
            format!("File name '{}' marks shared utilities", file_name),
        );
    }
    if stem_lower == "config" || stem_lower == "configuration" || stem_lower == "settings" {
        return (
            "configuration".to_string(),
            format!("File name '{}' marks configuration", file_name),
        );
    }
    if CONFIG_EXTENSIONS.contains(&extension.as_str()) {
        return (
            "configuration".to_string(),
            format!(".{} files hold configuration data", extension),
        );
    }
    if HEADER_EXTENSIONS.contains(&extension.as_str()) {
        return (
            "header".to_string(),
            format!(".{} files declare interfaces for C/C++ sources", extension),
        );
    }
    if COMPONENT_EXTENSIONS.contains(&extension.as_str())
        && stem.chars().next().is_some_and(|c| c.is_uppercase())
    {
        return (
            "component".to_string(),
            format!("Capitalized .{} file follows UI component naming", extension),
        );
    }
    if extension == "md" || stem_lower == "readme" {
        return (
            "documentation".to_string(),
            "Markdown or README documentation file".to_string(),
        );
    }
    if rel_path
        .components()
        .next()
        .is_some_and(|c| c.as_os_str() == "src")
    {
        return (
            "core".to_string(),
            "Located under 'src/', the core implementation tree".to_string(),
        );
    }

    (
        "module".to_string(),
        "No specific role markers; treated as a general module".to_string(),
    )
}

fn heuristic_summary(rel_path: &Path, language: &str, role: &str) -> String {
    let stem = rel_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let subject = humanize(&stem);
    let lang = if language == crate::core::languages::UNKNOWN_LANGUAGE {
        "Source".to_string()
    } else {
        language.to_string()
    };

    match role {
        "test" => format!("{} test module '{}'.", lang, subject),
        "entry_point" => format!(
            "{} entry point that wires up and launches the application.",
            lang
        ),
        "cli" => format!("{} command-line interface module.", lang),
        "utility" => format!("{} utility helpers shared across the project.", lang),
        "configuration" => format!("Configuration definitions ({}).", lang),
        "header" => format!(
            "{} header declaring the shared interface for '{}'.",
            lang, subject
        ),
        "component" => format!("{} UI component '{}'.", lang, stem),
        "documentation" => "Project documentation.".to_string(),
        "core" => format!("Core {} implementation module '{}'.", lang, subject),
        _ => format!("{} module '{}'.", lang, subject),
    }
}

fn humanize(stem: &str) -> String {
    stem.replace(['_', '-'], " ").to_lowercase()
}

/// loc 計算非空白行; todo_count 計算帶 TODO/FIXME 標記的行
pub fn compute_metrics(content: &str) -> Metrics {
    let mut loc = 0;
    let mut todo_count = 0;

    for line in content.lines() {
        if !line.trim().is_empty() {
            loc += 1;
        }
        if line.contains("TODO") || line.contains("FIXME") {
            todo_count += 1;
        }
    }

    Metrics { loc, todo_count }
}
