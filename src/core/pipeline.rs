use crate::core::languages::LanguageRegistry;
use crate::core::scanner::{self, ScanOptions};
use crate::core::tree::{self, TreeOptions};
use crate::core::{graph, report, summary, symbols};
use crate::domain::model::{AnalysisReport, ScanResult, SourceFile};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;
use std::path::Path;

pub struct AnalyzerPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    registry: LanguageRegistry,
}

impl<S: Storage, C: ConfigProvider> AnalyzerPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self::new_with_registry(storage, config, LanguageRegistry::with_defaults())
    }

    pub fn new_with_registry(storage: S, config: C, registry: LanguageRegistry) -> Self {
        Self {
            storage,
            config,
            registry,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for AnalyzerPipeline<S, C> {
    async fn scan(&self) -> Result<ScanResult> {
        let root = Path::new(self.config.root_path());
        tracing::debug!("Scanning repository at {}", root.display());

        let tree_options = TreeOptions {
            exclude_patterns: self.config.tree_exclude_patterns().to_vec(),
            max_depth: self.config.max_depth(),
        };
        let tree = tree::build_tree(root, &tree_options)?;

        // 檔案掃描沿用目錄樹的預設雜訊排除
        let mut exclude_dirs = self.config.exclude_dirs().to_vec();
        for name in tree::DEFAULT_EXCLUDES {
            if !exclude_dirs.iter().any(|d| d == name) {
                exclude_dirs.push(name.to_string());
            }
        }

        let options = ScanOptions {
            include_patterns: self.config.include_patterns().to_vec(),
            exclude_patterns: self.config.exclude_patterns().to_vec(),
            exclude_dirs,
        };
        let paths = scanner::scan_files(root, &options)?;

        let files = paths
            .iter()
            .map(|path| SourceFile {
                path: path.to_string_lossy().replace('\\', "/"),
                language: self.registry.language_name(path),
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            "Scan found {} files under {}",
            files.len(),
            root.display()
        );
        Ok(ScanResult { tree, files })
    }

    async fn analyze(&self, scan: ScanResult) -> Result<AnalysisReport> {
        tracing::debug!("Analyzing {} files", scan.files.len());

        let mut summaries = Vec::with_capacity(scan.files.len());
        let mut sources: Vec<(SourceFile, String)> = Vec::with_capacity(scan.files.len());

        for file in &scan.files {
            let bytes = self.storage.read_file(&file.path).await?;
            let content = String::from_utf8_lossy(&bytes).into_owned();

            let mut entry =
                summary::summarize_file(Path::new(&file.path), &file.language, &content);
            entry.symbols = symbols::extract_symbols(&file.language, &content);
            summaries.push(entry);

            // 全部檔案都是 import 解析的目標, 圖內只為可解析語言建節點
            sources.push((file.clone(), content));
        }

        let graph = graph::build_graph(&sources);
        tracing::debug!(
            "Dependency graph: {} nodes, {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );

        Ok(AnalysisReport {
            tree: scan.tree,
            summaries,
            graph,
        })
    }

    async fn report(&self, analysis: AnalysisReport) -> Result<String> {
        report::write_reports(&self.storage, &self.config, &analysis).await
    }
}
