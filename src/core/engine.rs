use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct AnalyzerEngine<P: Pipeline> {
    pipeline: P,
    monitor: Option<SystemMonitor>,
}

impl<P: Pipeline> AnalyzerEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: None,
        }
    }

    pub fn new_with_monitoring(pipeline: P, enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: if enabled {
                Some(SystemMonitor::new(enabled))
            } else {
                None
            },
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting repository analysis...");

        tracing::info!("Scanning repository...");
        let scan = self.pipeline.scan().await?;
        tracing::info!("Scanned {} files", scan.files.len());
        if let Some(monitor) = &self.monitor {
            monitor.log_stats("Scan");
        }

        tracing::info!("Analyzing files...");
        let analysis = self.pipeline.analyze(scan).await?;
        tracing::info!(
            "Analyzed {} files ({} graph nodes, {} edges)",
            analysis.summaries.len(),
            analysis.graph.nodes.len(),
            analysis.graph.edges.len()
        );
        if let Some(monitor) = &self.monitor {
            monitor.log_stats("Analyze");
        }

        tracing::info!("Writing reports...");
        let output_location = self.pipeline.report(analysis).await?;
        tracing::info!("Reports saved to: {}", output_location);
        if let Some(monitor) = &self.monitor {
            monitor.log_stats("Report");
            monitor.log_final_stats();
        }

        Ok(output_location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph;
    use crate::domain::model::{AnalysisReport, ScanResult, SourceFile, TreeNode};
    use crate::utils::error::AnalyzerError;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct MockPipeline {
        stages: Arc<Mutex<Vec<String>>>,
        fail_at: Option<&'static str>,
    }

    impl MockPipeline {
        fn new() -> Self {
            Self {
                stages: Arc::new(Mutex::new(Vec::new())),
                fail_at: None,
            }
        }

        fn failing_at(stage: &'static str) -> Self {
            Self {
                stages: Arc::new(Mutex::new(Vec::new())),
                fail_at: Some(stage),
            }
        }
    }

    #[async_trait::async_trait]
    impl Pipeline for MockPipeline {
        async fn scan(&self) -> Result<ScanResult> {
            self.stages.lock().await.push("scan".to_string());
            if self.fail_at == Some("scan") {
                return Err(AnalyzerError::ScanError {
                    message: "mock scan failure".to_string(),
                });
            }
            Ok(ScanResult {
                tree: TreeNode::directory("root", vec![TreeNode::file("a.py")]),
                files: vec![SourceFile {
                    path: "a.py".to_string(),
                    language: "Python".to_string(),
                }],
            })
        }

        async fn analyze(&self, scan: ScanResult) -> Result<AnalysisReport> {
            self.stages.lock().await.push("analyze".to_string());
            if self.fail_at == Some("analyze") {
                return Err(AnalyzerError::ProcessingError {
                    message: "mock analyze failure".to_string(),
                });
            }
            Ok(AnalysisReport {
                tree: scan.tree,
                summaries: vec![],
                graph: graph::build_graph(&[]),
            })
        }

        async fn report(&self, _analysis: AnalysisReport) -> Result<String> {
            self.stages.lock().await.push("report".to_string());
            Ok("out-dir".to_string())
        }
    }

    #[tokio::test]
    async fn test_run_executes_stages_in_order() {
        let pipeline = MockPipeline::new();
        let stages = pipeline.stages.clone();

        let engine = AnalyzerEngine::new(pipeline);
        let location = engine.run().await.unwrap();

        assert_eq!(location, "out-dir");
        assert_eq!(*stages.lock().await, vec!["scan", "analyze", "report"]);
    }

    #[tokio::test]
    async fn test_run_stops_at_first_failing_stage() {
        let pipeline = MockPipeline::failing_at("analyze");
        let stages = pipeline.stages.clone();

        let engine = AnalyzerEngine::new(pipeline);
        let result = engine.run().await;

        assert!(matches!(
            result,
            Err(AnalyzerError::ProcessingError { .. })
        ));
        assert_eq!(*stages.lock().await, vec!["scan", "analyze"]);
    }

    #[tokio::test]
    async fn test_scan_failure_propagates() {
        let engine = AnalyzerEngine::new(MockPipeline::failing_at("scan"));
        let result = engine.run().await;

        assert!(matches!(result, Err(AnalyzerError::ScanError { .. })));
    }

    #[tokio::test]
    async fn test_monitoring_engine_still_runs() {
        let pipeline = MockPipeline::new();
        let engine = AnalyzerEngine::new_with_monitoring(pipeline, false);

        let location = engine.run().await.unwrap();
        assert_eq!(location, "out-dir");
    }
}
