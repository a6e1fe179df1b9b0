use crate::utils::error::{AnalyzerError, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub exclude_dirs: Vec<String>,
}

/// Glob matcher with the scan's dual matching rule: patterns containing `/`
/// are tested against the relative path, bare patterns against the file name
/// alone. `*` never crosses a separator; `**` does.
#[derive(Debug)]
pub struct PatternMatcher {
    path_set: GlobSet,
    name_set: GlobSet,
    empty: bool,
}

impl PatternMatcher {
    pub fn compile(field_name: &str, patterns: &[String]) -> Result<Self> {
        let mut path_builder = GlobSetBuilder::new();
        let mut name_builder = GlobSetBuilder::new();

        for pattern in patterns {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| AnalyzerError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: pattern.clone(),
                    reason: format!("Invalid glob pattern: {}", e),
                })?;

            if pattern.contains('/') {
                path_builder.add(glob);
            } else {
                name_builder.add(glob);
            }
        }

        let build_err = |e: globset::Error| AnalyzerError::ValidationError {
            message: format!("Failed to compile {} patterns: {}", field_name, e),
        };

        Ok(Self {
            path_set: path_builder.build().map_err(build_err)?,
            name_set: name_builder.build().map_err(build_err)?,
            empty: patterns.is_empty(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn matches(&self, rel_path: &Path, name: &str) -> bool {
        self.path_set.is_match(rel_path) || self.name_set.is_match(name)
    }
}

/// 遞迴掃描 root 下符合條件的一般檔案, 回傳排序後的相對路徑
pub fn scan_files(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(AnalyzerError::ScanError {
            message: format!("Scan root is not a directory: {}", root.display()),
        });
    }

    let include = PatternMatcher::compile("include_patterns", &options.include_patterns)?;
    let exclude = PatternMatcher::compile("exclude_patterns", &options.exclude_patterns)?;

    let mut files = Vec::new();
    walk(
        root,
        Path::new(""),
        &include,
        &exclude,
        &options.exclude_dirs,
        &mut files,
    )?;

    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    Ok(files)
}

fn walk(
    dir: &Path,
    rel_dir: &Path,
    include: &PatternMatcher,
    exclude: &PatternMatcher,
    exclude_dirs: &[String],
    out: &mut Vec<PathBuf>,
) -> Result<()> {
    let read = fs::read_dir(dir).map_err(|e| AnalyzerError::ScanError {
        message: format!("Failed to read {}: {}", dir.display(), e),
    })?;

    let mut entries = Vec::new();
    for entry in read {
        entries.push(entry.map_err(|e| AnalyzerError::ScanError {
            message: format!("Failed to read entry in {}: {}", dir.display(), e),
        })?);
    }
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let file_type = entry.file_type().map_err(|e| AnalyzerError::ScanError {
            message: format!("Failed to stat {}: {}", entry.path().display(), e),
        })?;

        // 不追蹤 symlink
        if file_type.is_symlink() {
            continue;
        }

        let rel_path = if rel_dir.as_os_str().is_empty() {
            PathBuf::from(&name)
        } else {
            rel_dir.join(&name)
        };

        if file_type.is_dir() {
            if name.starts_with('.') {
                continue;
            }
            if exclude_dirs.iter().any(|d| d == &name) {
                continue;
            }
            // 路徑型排除樣式 (例如 docs/_build) 在走訪時就剪掉整棵子樹
            if exclude.matches(&rel_path, &name) {
                continue;
            }
            walk(&entry.path(), &rel_path, include, exclude, exclude_dirs, out)?;
        } else if file_type.is_file() {
            if !include.is_empty() && !include.matches(&rel_path, &name) {
                continue;
            }
            if exclude.matches(&rel_path, &name) {
                continue;
            }
            out.push(rel_path);
        }
    }

    Ok(())
}
