use crate::core::{classify, imports};
use crate::domain::model::{
    DependencyBucket, DependencyGraph, DependencyType, ExternalDependency, ExternalSummary,
    GraphEdge, GraphNode, SourceFile,
};
use std::collections::{BTreeSet, HashSet};

const PARSEABLE_LANGUAGES: &[&str] = &["Python", "JavaScript", "TypeScript", "HTML", "Perl"];

pub fn is_parseable(language: &str) -> bool {
    PARSEABLE_LANGUAGES.contains(&language)
}

fn extract_specifiers(language: &str, content: &str) -> Vec<String> {
    match language {
        "Python" => imports::extract_python_imports(content),
        "JavaScript" | "TypeScript" => imports::extract_js_imports(content),
        "HTML" => imports::extract_html_refs(content),
        "Perl" => imports::extract_perl_imports(content),
        _ => Vec::new(),
    }
}

/// 由掃描到的檔案內容建立依賴圖
///
/// 可解析語言的檔案各成一個節點; import 解析得到的 repo 內檔案成為邊,
/// 解析不到的則分類後掛到節點的外部依賴與全域統計. 節點/邊/統計全部排序,
/// 同一輸入必產生同一輸出.
pub fn build_graph(sources: &[(SourceFile, String)]) -> DependencyGraph {
    let scanned: HashSet<String> = sources.iter().map(|(file, _)| file.path.clone()).collect();

    let mut nodes = Vec::new();
    let mut edges: BTreeSet<GraphEdge> = BTreeSet::new();
    let mut stdlib: BTreeSet<String> = BTreeSet::new();
    let mut third_party: BTreeSet<String> = BTreeSet::new();
    let mut unknown: BTreeSet<String> = BTreeSet::new();

    for (file, content) in sources {
        if !is_parseable(&file.language) {
            continue;
        }

        let specifiers = extract_specifiers(&file.language, content);
        let mut externals: BTreeSet<(String, DependencyType)> = BTreeSet::new();

        for specifier in &specifiers {
            match imports::resolve_import(&file.language, specifier, &file.path, &scanned) {
                Some(target) => {
                    edges.insert(GraphEdge {
                        from: file.path.clone(),
                        to: target,
                    });
                }
                None => {
                    let kind = classify::classify(&file.language, specifier);
                    let name = external_name(&file.language, specifier, kind);
                    match kind {
                        DependencyType::Stdlib => stdlib.insert(name.clone()),
                        DependencyType::ThirdParty => third_party.insert(name.clone()),
                        DependencyType::Unknown => unknown.insert(name.clone()),
                    };
                    externals.insert((name, kind));
                }
            }
        }

        nodes.push(GraphNode {
            id: file.path.clone(),
            language: file.language.clone(),
            imports_total: specifiers.len(),
            external_dependencies: externals
                .into_iter()
                .map(|(name, kind)| ExternalDependency { name, kind })
                .collect(),
        });
    }

    nodes.sort_by(|a, b| a.id.cmp(&b.id));

    DependencyGraph {
        nodes,
        edges: edges.into_iter().collect(),
        external_summary: ExternalSummary {
            stdlib: bucket(stdlib),
            third_party: bucket(third_party),
            unknown: bucket(unknown),
        },
    }
}

/// 外部依賴記錄套件身分 (numpy.linalg → numpy); 無法分類的保留原樣
fn external_name(language: &str, specifier: &str, kind: DependencyType) -> String {
    match kind {
        DependencyType::Unknown => specifier.to_string(),
        _ => {
            let top = classify::top_level_module(language, specifier);
            if top.is_empty() {
                specifier.to_string()
            } else {
                top
            }
        }
    }
}

fn bucket(names: BTreeSet<String>) -> DependencyBucket {
    DependencyBucket {
        count: names.len(),
        names: names.into_iter().collect(),
    }
}
