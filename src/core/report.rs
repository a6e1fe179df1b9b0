use crate::core::tree;
use crate::domain::model::{
    AnalysisReport, DependencyBucket, DependencyGraph, FileSummary, GraphReport, SummaryReport,
    SCHEMA_VERSION,
};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{AnalyzerError, Result};
use std::collections::BTreeMap;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// 把檔案摘要整理成穩定排序的報告 (路徑排序, schema 固定)
pub fn summary_report(summaries: &[FileSummary]) -> SummaryReport {
    let mut files = summaries.to_vec();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    SummaryReport {
        schema_version: SCHEMA_VERSION.to_string(),
        total_files: files.len(),
        files,
    }
}

pub fn render_summaries_markdown(summaries: &[FileSummary]) -> String {
    let mut lines = vec!["# File Summaries\n".to_string()];
    lines.push(
        "Heuristic summaries of source files based on filenames, extensions, and paths.\n"
            .to_string(),
    );
    lines.push(format!("Schema Version: {}\n", SCHEMA_VERSION));
    lines.push(format!("Total files: {}\n", summaries.len()));

    for entry in summaries {
        lines.push(format!("## {}", entry.path));
        lines.push(format!("**Language:** {}  ", entry.language));
        lines.push(format!(
            "**Role:** {} ({})  ",
            entry.role, entry.role_justification
        ));
        lines.push(format!("**Summary:** {}  ", entry.summary));
        lines.push(format!("**Lines of code:** {}  ", entry.metrics.loc));
        lines.push(format!("**TODO markers:** {}  ", entry.metrics.todo_count));
        lines.push(String::new());
    }

    lines.join("\n")
}

pub fn render_summaries_csv(summaries: &[FileSummary]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "path",
        "language",
        "role",
        "role_justification",
        "summary",
        "loc",
        "todo_count",
    ])?;

    for entry in summaries {
        let loc = entry.metrics.loc.to_string();
        let todos = entry.metrics.todo_count.to_string();
        writer.write_record([
            entry.path.as_str(),
            entry.language.as_str(),
            entry.role.as_str(),
            entry.role_justification.as_str(),
            entry.summary.as_str(),
            loc.as_str(),
            todos.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AnalyzerError::ProcessingError {
            message: format!("Failed to flush CSV writer: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| AnalyzerError::ProcessingError {
        message: format!("CSV output was not valid UTF-8: {}", e),
    })
}

pub fn render_dependencies_markdown(graph: &DependencyGraph) -> String {
    let mut lines = vec!["# Dependency Graph\n".to_string()];
    lines.push(
        "Intra-repository dependency analysis for Python, JavaScript/TypeScript, HTML, and Perl files.\n"
            .to_string(),
    );

    lines.push("## Statistics\n".to_string());
    lines.push(format!("- **Total files**: {}", graph.nodes.len()));
    lines.push(format!("- **Total dependencies**: {}\n", graph.edges.len()));

    let mut by_language: BTreeMap<&str, usize> = BTreeMap::new();
    for node in &graph.nodes {
        *by_language.entry(node.language.as_str()).or_insert(0) += 1;
    }
    if !by_language.is_empty() {
        lines.push("Files per language:\n".to_string());
        for (language, count) in &by_language {
            lines.push(format!("- {}: {}", language, count));
        }
        lines.push(String::new());
    }

    let mut dependents: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dependencies: BTreeMap<&str, usize> = BTreeMap::new();
    for edge in &graph.edges {
        *dependencies.entry(edge.from.as_str()).or_insert(0) += 1;
        *dependents.entry(edge.to.as_str()).or_insert(0) += 1;
    }

    if !dependents.is_empty() {
        lines.push("## Most Depended Upon Files\n".to_string());
        for (path, count) in top_ranked(&dependents) {
            lines.push(format!("- `{}` ({} dependents)", path, count));
        }
        lines.push(String::new());
    }

    if !dependencies.is_empty() {
        lines.push("## Files with Most Dependencies\n".to_string());
        for (path, count) in top_ranked(&dependencies) {
            lines.push(format!("- `{}` ({} dependencies)", path, count));
        }
        lines.push(String::new());
    }

    let external = &graph.external_summary;
    let external_total = external.stdlib.count + external.third_party.count + external.unknown.count;
    if external_total > 0 {
        lines.push("## External Dependencies\n".to_string());
        push_bucket(&mut lines, "Standard library", &external.stdlib);
        push_bucket(&mut lines, "Third-party", &external.third_party);
        push_bucket(&mut lines, "Unresolved", &external.unknown);
    }

    lines.join("\n")
}

/// 依 (次數降冪, 路徑升冪) 取前十名, 同次數時輸出順序固定
fn top_ranked<'a>(counts: &BTreeMap<&'a str, usize>) -> Vec<(&'a str, usize)> {
    let mut ranked: Vec<(&str, usize)> = counts.iter().map(|(path, count)| (*path, *count)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(10);
    ranked
}

fn push_bucket(lines: &mut Vec<String>, title: &str, bucket: &DependencyBucket) {
    if bucket.count == 0 {
        return;
    }
    lines.push(format!("### {} ({})\n", title, bucket.count));
    for name in &bucket.names {
        lines.push(format!("- `{}`", name));
    }
    lines.push(String::new());
}

pub fn render_summary_index(report: &AnalysisReport, written: &[String]) -> String {
    let mut lines = vec!["# Repository Analysis Summary\n".to_string()];
    lines.push("This document provides an overview of the repository analysis results.\n".to_string());

    lines.push("## Generated Reports\n".to_string());
    for name in written {
        lines.push(format!("- **{}**: {}", name, describe_report(name)));
    }
    lines.push(String::new());

    lines.push("## Analysis Metadata\n".to_string());
    lines.push(format!("- Files analyzed: {}", report.summaries.len()));
    lines.push(format!(
        "- Dependency graph: {} nodes, {} edges",
        report.graph.nodes.len(),
        report.graph.edges.len()
    ));
    lines.push(format!(
        "- Directory entries: {}",
        tree::count_nodes(&report.tree)
    ));
    lines.push(String::new());

    lines.join("\n")
}

fn describe_report(name: &str) -> &'static str {
    match name {
        "tree.md" => "Complete directory tree structure",
        "tree.json" => "Machine-readable tree structure",
        "file-summaries.md" => "Per-file roles, summaries, and metrics",
        "file-summaries.json" => "Machine-readable per-file analysis",
        "file-summaries.csv" => "Per-file metrics in spreadsheet form",
        "dependencies.md" => "Dependency statistics and external packages",
        "dependencies.json" => "Dependency graph and package information",
        _ => "Additional report",
    }
}

/// 依設定的輸出格式產生所有報告內容
///
/// tree.md 與 SUMMARY.md 一定會產生; tree.json 受 [tree] generate_json
/// 管控, 其餘各依 markdown/json/csv 格式開關. 沒有任何檔案符合掃描條件時
/// 跳過檔案摘要類報告.
pub fn render_reports<C: ConfigProvider>(
    config: &C,
    report: &AnalysisReport,
) -> Result<Vec<(String, String)>> {
    let formats = config.output_formats();
    let markdown = formats.iter().any(|f| f == "markdown");
    let json = formats.iter().any(|f| f == "json");
    let csv_enabled = formats.iter().any(|f| f == "csv");

    let mut files: Vec<(String, String)> = Vec::new();

    files.push(("tree.md".to_string(), tree::tree_to_markdown(&report.tree)));
    if json && config.generate_tree_json() {
        files.push((
            "tree.json".to_string(),
            serde_json::to_string_pretty(&report.tree)?,
        ));
    }

    if report.summaries.is_empty() {
        tracing::warn!("No files found matching criteria; skipping file summary reports");
    } else {
        let summary = summary_report(&report.summaries);
        if markdown {
            files.push((
                "file-summaries.md".to_string(),
                render_summaries_markdown(&summary.files),
            ));
        }
        if json {
            files.push((
                "file-summaries.json".to_string(),
                serde_json::to_string_pretty(&summary)?,
            ));
        }
        if csv_enabled {
            files.push((
                "file-summaries.csv".to_string(),
                render_summaries_csv(&summary.files)?,
            ));
        }
    }

    if markdown {
        files.push((
            "dependencies.md".to_string(),
            render_dependencies_markdown(&report.graph),
        ));
    }
    if json {
        let graph_report = GraphReport {
            schema_version: SCHEMA_VERSION.to_string(),
            graph: report.graph.clone(),
        };
        files.push((
            "dependencies.json".to_string(),
            serde_json::to_string_pretty(&graph_report)?,
        ));
    }

    let written: Vec<String> = files.iter().map(|(name, _)| name.clone()).collect();
    files.push((
        "SUMMARY.md".to_string(),
        render_summary_index(report, &written),
    ));

    Ok(files)
}

/// 寫出所有報告並回傳輸出位置; dry-run 只記錄意圖不落盤
pub async fn write_reports<S: Storage, C: ConfigProvider>(
    storage: &S,
    config: &C,
    report: &AnalysisReport,
) -> Result<String> {
    let files = render_reports(config, report)?;
    let output_dir = config.output_dir();

    if config.dry_run() {
        for (name, contents) in &files {
            tracing::info!(
                "[DRY RUN] Would write {}/{} ({} bytes)",
                output_dir,
                name,
                contents.len()
            );
        }
        if config.archive_enabled() {
            tracing::info!(
                "[DRY RUN] Would archive {} reports into {}/{}",
                files.len(),
                output_dir,
                archive_filename(config)
            );
        }
        tracing::info!("[DRY RUN] Scan complete, no files were written");
        return Ok(output_dir.to_string());
    }

    for (name, contents) in &files {
        let path = format!("{}/{}", output_dir, name);
        storage.write_file(&path, contents.as_bytes()).await?;
        tracing::info!("Report written: {}", path);
    }

    if config.archive_enabled() {
        let archive_name = archive_filename(config);
        let zip_data = build_archive(&files, config.archive_include_graph())?;
        let path = format!("{}/{}", output_dir, archive_name);
        tracing::debug!("Writing report archive ({} bytes) to {}", zip_data.len(), path);
        storage.write_file(&path, &zip_data).await?;
        tracing::info!("Report archive written: {}", path);
    }

    Ok(output_dir.to_string())
}

fn archive_filename<C: ConfigProvider>(config: &C) -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
    config.archive_filename().replace("{timestamp}", &timestamp)
}

fn build_archive(files: &[(String, String)], include_graph: bool) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (name, contents) in files {
        if !include_graph && name.starts_with("dependencies") {
            continue;
        }
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(contents.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
