use crate::domain::model::{AnalysisReport, ScanResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn root_path(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn include_patterns(&self) -> &[String];
    fn exclude_patterns(&self) -> &[String];
    fn exclude_dirs(&self) -> &[String];
    fn tree_exclude_patterns(&self) -> &[String];
    fn max_depth(&self) -> Option<usize>;
    fn generate_tree_json(&self) -> bool;
    fn output_formats(&self) -> &[String];
    fn archive_enabled(&self) -> bool;
    fn archive_filename(&self) -> &str;
    fn archive_include_graph(&self) -> bool;
    fn dry_run(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn scan(&self) -> Result<ScanResult>;
    async fn analyze(&self, scan: ScanResult) -> Result<AnalysisReport>;
    async fn report(&self, report: AnalysisReport) -> Result<String>;
}
