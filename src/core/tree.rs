use crate::domain::model::{NodeKind, TreeNode};
use crate::utils::error::{AnalyzerError, Result};
use std::path::Path;

/// 目錄樹預設排除的雜訊目錄
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".git",
    "node_modules",
    ".venv",
    "venv",
    "build",
    "__pycache__",
];

#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    /// 在預設排除之外追加的樣式 (精確名稱, `*.suffix`, `prefix*`)
    pub exclude_patterns: Vec<String>,
    /// 走訪深度上限; 0 代表只有根目錄, None 不設限
    pub max_depth: Option<usize>,
}

/// 走訪目錄建立樹狀結構, 排序後輸出穩定
pub fn build_tree(root: &Path, options: &TreeOptions) -> Result<TreeNode> {
    if !root.is_dir() {
        return Err(AnalyzerError::ScanError {
            message: format!("Path is not a directory: {}", root.display()),
        });
    }

    let mut excludes: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
    excludes.extend(options.exclude_patterns.iter().cloned());

    let root_name = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());

    walk(root, root_name, &excludes, options.max_depth, 0)
}

fn walk(
    dir: &Path,
    name: String,
    excludes: &[String],
    max_depth: Option<usize>,
    depth: usize,
) -> Result<TreeNode> {
    if max_depth.is_some_and(|limit| depth >= limit) {
        return Ok(TreeNode::directory(name, Vec::new()));
    }

    let read_dir = std::fs::read_dir(dir).map_err(|e| AnalyzerError::ScanError {
        message: format!("Failed to read directory {}: {}", dir.display(), e),
    })?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| AnalyzerError::ScanError {
            message: format!("Failed to read directory {}: {}", dir.display(), e),
        })?;
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let entry_name = entry.file_name().to_string_lossy().into_owned();
        entries.push((entry.path(), entry_name, file_type));
    }

    // 目錄優先, 名稱不分大小寫排序
    entries.sort_by(|a, b| {
        (!a.2.is_dir(), a.1.to_lowercase(), &a.1).cmp(&(!b.2.is_dir(), b.1.to_lowercase(), &b.1))
    });

    let mut children = Vec::new();
    for (path, entry_name, file_type) in entries {
        if should_exclude(&entry_name, excludes) {
            continue;
        }
        // symlink 可能指向 repo 外, 一律略過
        if file_type.is_symlink() {
            continue;
        }

        if file_type.is_dir() {
            children.push(walk(&path, entry_name, excludes, max_depth, depth + 1)?);
        } else if file_type.is_file() {
            children.push(TreeNode::file(entry_name));
        }
    }

    Ok(TreeNode::directory(name, children))
}

fn should_exclude(name: &str, patterns: &[String]) -> bool {
    for pattern in patterns {
        if name == pattern {
            return true;
        }
        if let Some(suffix) = pattern.strip_prefix('*') {
            if name.ends_with(suffix) {
                return true;
            }
        } else if let Some(prefix) = pattern.strip_suffix('*') {
            if name.starts_with(prefix) {
                return true;
            }
        }
    }
    false
}

/// 轉成 Markdown 樹: 根目錄為標題, 子項目用 ├──/└── 標記加兩空白縮排
pub fn tree_to_markdown(tree: &TreeNode) -> String {
    let mut lines = vec![format!("# {}\n", tree.name)];
    render_children(tree, 0, &mut lines);
    lines.join("\n")
}

fn render_children(node: &TreeNode, indent: usize, lines: &mut Vec<String>) {
    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        let marker = if i + 1 == children.len() {
            "└──"
        } else {
            "├──"
        };
        lines.push(format!("{}{} {}", "  ".repeat(indent), marker, child.name));
        if child.kind == NodeKind::Directory {
            render_children(child, indent + 1, lines);
        }
    }
}

pub fn count_nodes(tree: &TreeNode) -> usize {
    1 + tree.children().iter().map(count_nodes).sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn touch(path: &PathBuf) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn names(node: &TreeNode) -> Vec<&str> {
        node.children().iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_default_excludes_hide_noise_directories() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join(".git/config"));
        touch(&dir.path().join("node_modules/pkg/index.js"));
        touch(&dir.path().join("__pycache__/mod.pyc"));
        touch(&dir.path().join("src/main.py"));

        let tree = build_tree(dir.path(), &TreeOptions::default()).unwrap();

        assert_eq!(names(&tree), vec!["src"]);
    }

    #[test]
    fn test_exclude_pattern_forms() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("keep.py"));
        touch(&dir.path().join("drop.pyc"));
        touch(&dir.path().join("temp_scratch.txt"));
        touch(&dir.path().join("dist/bundle.js"));

        let options = TreeOptions {
            exclude_patterns: vec![
                "*.pyc".to_string(),
                "temp*".to_string(),
                "dist".to_string(),
            ],
            max_depth: None,
        };
        let tree = build_tree(dir.path(), &options).unwrap();

        assert_eq!(names(&tree), vec!["keep.py"]);
    }

    #[test]
    fn test_directories_first_case_insensitive_order() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("b.txt"));
        touch(&dir.path().join("A.txt"));
        fs::create_dir(dir.path().join("Zdir")).unwrap();
        fs::create_dir(dir.path().join("adir")).unwrap();

        let tree = build_tree(dir.path(), &TreeOptions::default()).unwrap();

        assert_eq!(names(&tree), vec!["adir", "Zdir", "A.txt", "b.txt"]);
    }

    #[test]
    fn test_max_depth_zero_keeps_root_only() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/main.py"));

        let options = TreeOptions {
            exclude_patterns: Vec::new(),
            max_depth: Some(0),
        };
        let tree = build_tree(dir.path(), &options).unwrap();

        assert!(tree.children().is_empty());
        assert_eq!(count_nodes(&tree), 1);
    }

    #[test]
    fn test_max_depth_truncates_subdirectories() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/deep/nested.py"));
        touch(&dir.path().join("top.txt"));

        let options = TreeOptions {
            exclude_patterns: Vec::new(),
            max_depth: Some(1),
        };
        let tree = build_tree(dir.path(), &options).unwrap();

        assert_eq!(names(&tree), vec!["src", "top.txt"]);
        // The depth-limited directory is present but not descended into
        assert!(tree.children()[0].children().is_empty());
    }

    #[test]
    fn test_markdown_rendering() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/main.py"));
        touch(&dir.path().join("README.md"));

        let tree = build_tree(dir.path(), &TreeOptions::default()).unwrap();
        let root_name = dir.path().file_name().unwrap().to_string_lossy();
        let markdown = tree_to_markdown(&tree);

        let expected = format!(
            "# {}\n\n├── src\n  └── main.py\n└── README.md",
            root_name
        );
        assert_eq!(markdown, expected);
    }

    #[test]
    fn test_markdown_for_empty_root() {
        let dir = TempDir::new().unwrap();
        let tree = build_tree(dir.path(), &TreeOptions::default()).unwrap();
        let markdown = tree_to_markdown(&tree);

        assert!(markdown.starts_with("# "));
        assert!(!markdown.contains("├──"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_skipped() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("real.txt"));
        std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt"))
            .unwrap();

        let tree = build_tree(dir.path(), &TreeOptions::default()).unwrap();

        assert_eq!(names(&tree), vec!["real.txt"]);
    }

    #[test]
    fn test_non_directory_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        touch(&file);

        let result = build_tree(&file, &TreeOptions::default());

        assert!(result.is_err());
    }

    #[test]
    fn test_json_shape_omits_children_for_files() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("main.py"));

        let tree = build_tree(dir.path(), &TreeOptions::default()).unwrap();
        let value = serde_json::to_value(&tree).unwrap();

        assert_eq!(value["type"], "directory");
        assert_eq!(value["children"][0]["type"], "file");
        assert!(value["children"][0].get("children").is_none());
    }

    #[test]
    fn test_count_nodes() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/a.py"));
        touch(&dir.path().join("src/b.py"));
        touch(&dir.path().join("README.md"));

        let tree = build_tree(dir.path(), &TreeOptions::default()).unwrap();

        // root + src + 2 files + README
        assert_eq!(count_nodes(&tree), 5);
    }
}
