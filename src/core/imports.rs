use regex::Regex;
use std::collections::HashSet;

/// 擷取 Python import 目標 (略過 docstring 與註解, 接回反斜線續行)
pub fn extract_python_imports(content: &str) -> Vec<String> {
    let code_lines = filter_python_strings(content);
    let statements = join_python_continuations(&code_lines);

    let import_re = Regex::new(r"^\s*import\s+([\w.,\s]+?)(?:\s*#.*)?$").unwrap();
    let from_re = Regex::new(r"^\s*from\s+([\w.]+)\s+import\s+\(?([^)#]+)\)?").unwrap();

    let mut imports = Vec::new();

    for line in &statements {
        if line.trim_start().starts_with('#') {
            continue;
        }

        if let Some(caps) = import_re.captures(line) {
            for module_part in caps[1].split(',') {
                let module_part = module_part.trim();
                if module_part.is_empty() {
                    continue;
                }
                let module = match module_part.split_once(" as ") {
                    Some((module, _alias)) => module.trim(),
                    None => module_part,
                };
                imports.push(module.to_string());
            }
            continue;
        }

        if let Some(caps) = from_re.captures(line) {
            let module = &caps[1];
            for name in caps[2].split(',') {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                if name == "*" {
                    imports.push(module.to_string());
                    continue;
                }
                let name = name.split_whitespace().next().unwrap_or(name);
                if module.starts_with('.') {
                    // from . import utils → ".utils", from ..pkg import x → "..pkg.x"
                    if module.chars().any(|c| c.is_alphanumeric()) {
                        imports.push(format!("{}.{}", module, name));
                    } else {
                        imports.push(format!("{}{}", module, name));
                    }
                } else {
                    imports.push(format!("{}.{}", module, name));
                }
            }
        }
    }

    dedup_in_order(imports)
}

fn filter_python_strings(content: &str) -> Vec<String> {
    let mut filtered = Vec::new();
    let mut in_triple_single = false;
    let mut in_triple_double = false;

    for line in content.lines() {
        let double_count = line.matches("\"\"\"").count();
        for _ in 0..double_count {
            in_triple_double = !in_triple_double;
        }
        let single_count = line.matches("'''").count();
        for _ in 0..single_count {
            in_triple_single = !in_triple_single;
        }

        if in_triple_single || in_triple_double {
            continue;
        }

        let stripped = line.trim_start();
        let single_line_string = (stripped.starts_with('"') && !stripped.starts_with("\"\"\""))
            || (stripped.starts_with('\'') && !stripped.starts_with("'''"));
        if !single_line_string {
            filtered.push(line.to_string());
        }
    }

    filtered
}

fn join_python_continuations(lines: &[String]) -> Vec<String> {
    let mut statements = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];
        let stripped = line.trim_start();

        if stripped.starts_with('#') {
            i += 1;
            continue;
        }

        if stripped.starts_with("import ") || stripped.starts_with("from ") {
            let mut accumulated = line.clone();

            if accumulated.contains('(') && !accumulated.contains(')') {
                while i + 1 < lines.len() {
                    i += 1;
                    accumulated.push(' ');
                    accumulated.push_str(lines[i].trim());
                    if lines[i].contains(')') {
                        break;
                    }
                }
            } else {
                while accumulated.trim_end().ends_with('\\') && i + 1 < lines.len() {
                    let trimmed = accumulated.trim_end();
                    accumulated = trimmed[..trimmed.len() - 1].to_string();
                    i += 1;
                    accumulated.push(' ');
                    accumulated.push_str(lines[i].trim());
                }
            }

            statements.push(accumulated);
        } else {
            statements.push(line.clone());
        }

        i += 1;
    }

    statements
}

/// 擷取 JS/TS import 目標 (ES6 / require / dynamic import, 去除註解)
pub fn extract_js_imports(content: &str) -> Vec<String> {
    let content = strip_c_style_comments(content);

    let es6_re = Regex::new(r#"import\s+(?:[\w\s{},*]+\s+from\s+)?['"]([^'"]+)['"]"#).unwrap();
    let reexport_re = Regex::new(r#"export\s+[\w\s{},*]+\s+from\s+['"]([^'"]+)['"]"#).unwrap();
    let require_re = Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap();
    let dynamic_re = Regex::new(r#"import\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap();

    let mut imports = Vec::new();
    for re in [&es6_re, &reexport_re, &require_re, &dynamic_re] {
        for caps in re.captures_iter(&content) {
            let whole = caps.get(0).unwrap();
            if !is_inside_string(&content, whole.start()) {
                imports.push(caps[1].to_string());
            }
        }
    }

    dedup_in_order(imports)
}

/// 去除 C 家族語法的 /* */ 與 // 註解 (引號數為奇數時 // 視為在字串裡)
pub(crate) fn strip_c_style_comments(content: &str) -> String {
    let block_comment_re = Regex::new(r"(?s)/\*.*?\*/").unwrap();
    let content = block_comment_re.replace_all(content, "");

    let mut lines = Vec::new();
    for line in content.lines() {
        match line.find("//") {
            Some(pos) => {
                let before = &line[..pos];
                let in_single = count_unescaped(before, '\'') % 2 == 1;
                let in_double = count_unescaped(before, '"') % 2 == 1;
                if in_single || in_double {
                    lines.push(line.to_string());
                } else {
                    lines.push(before.to_string());
                }
            }
            None => lines.push(line.to_string()),
        }
    }

    lines.join("\n")
}

fn count_unescaped(text: &str, quote: char) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut count = 0;

    for (i, &c) in chars.iter().enumerate() {
        if c != quote {
            continue;
        }
        let mut backslashes = 0;
        let mut j = i;
        while j > 0 && chars[j - 1] == '\\' {
            backslashes += 1;
            j -= 1;
        }
        if backslashes % 2 == 0 {
            count += 1;
        }
    }

    count
}

fn is_inside_string(content: &str, pos: usize) -> bool {
    let before = &content[..pos];
    count_unescaped(before, '\'') % 2 == 1
        || count_unescaped(before, '"') % 2 == 1
        || count_unescaped(before, '`') % 2 == 1
}

/// 擷取 HTML 文件引用的 script/stylesheet (略過 http/https/protocol-relative)
pub fn extract_html_refs(content: &str) -> Vec<String> {
    let script_re = Regex::new(r#"(?is)<script\b[^>]*\bsrc\s*=\s*["']([^"']+)["']"#).unwrap();
    let link_re = Regex::new(r"(?is)<link\b[^>]*>").unwrap();
    let rel_re = Regex::new(r#"(?i)\brel\s*=\s*["']([^"']+)["']"#).unwrap();
    let href_re = Regex::new(r#"(?i)\bhref\s*=\s*["']([^"']+)["']"#).unwrap();

    let mut refs = Vec::new();

    for caps in script_re.captures_iter(content) {
        refs.push(caps[1].to_string());
    }

    for tag in link_re.find_iter(content) {
        let tag_text = tag.as_str();
        let is_stylesheet = rel_re
            .captures(tag_text)
            .is_some_and(|caps| caps[1].to_lowercase().contains("stylesheet"));
        if !is_stylesheet {
            continue;
        }
        if let Some(caps) = href_re.captures(tag_text) {
            refs.push(caps[1].to_string());
        }
    }

    refs.retain(|r| !is_external_ref(r));
    dedup_in_order(refs)
}

fn is_external_ref(specifier: &str) -> bool {
    specifier.starts_with("http://")
        || specifier.starts_with("https://")
        || specifier.starts_with("//")
}

/// 擷取 Perl use/require 模組 (小寫單字視為 pragma, 不算依賴)
pub fn extract_perl_imports(content: &str) -> Vec<String> {
    let use_re = Regex::new(r"(?m)^\s*use\s+([\w:]+)").unwrap();
    let require_re = Regex::new(r#"(?m)^\s*require\s+(?:([\w:]+)|["']([^"']+)["'])"#).unwrap();

    let mut imports = Vec::new();
    for caps in use_re.captures_iter(content) {
        let module = &caps[1];
        if !is_perl_pragma(module) {
            imports.push(module.to_string());
        }
    }
    for caps in require_re.captures_iter(content) {
        if let Some(module) = caps.get(1).or_else(|| caps.get(2)) {
            imports.push(module.as_str().to_string());
        }
    }

    dedup_in_order(imports)
}

fn is_perl_pragma(module: &str) -> bool {
    // 慣例上 pragma 全小寫 (strict, warnings, utf8); 模組首字大寫 (POSIX, Data::Dumper)
    !module.contains("::")
        && module
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase())
}

const JS_EXTENSIONS: &[&str] = &["js", "ts", "jsx", "tsx", "mjs", "cjs"];
const PYTHON_SEARCH_BASES: &[&str] = &["", "src", "lib"];

/// 將 import 目標解析為掃描到的 repo 內檔案; 解析不到即視為外部依賴
pub fn resolve_import(
    language: &str,
    specifier: &str,
    source_path: &str,
    files: &HashSet<String>,
) -> Option<String> {
    match language {
        "Python" => resolve_python_import(specifier, source_path, files),
        "JavaScript" | "TypeScript" => resolve_js_import(specifier, source_path, files),
        "HTML" => resolve_html_ref(specifier, source_path, files),
        _ => None,
    }
}

fn resolve_python_import(
    specifier: &str,
    source_path: &str,
    files: &HashSet<String>,
) -> Option<String> {
    if let Some(stripped) = specifier.strip_prefix('.') {
        // 相對匯入: 點數決定往上幾層
        let mut level = 1;
        let mut rest = stripped;
        while let Some(next) = rest.strip_prefix('.') {
            level += 1;
            rest = next;
        }

        let mut base = parent_dir(source_path);
        for _ in 0..level - 1 {
            if base.is_empty() {
                return None;
            }
            base = parent_dir(&base);
        }

        if rest.is_empty() {
            // from . import * 之類, 解析為套件的 __init__.py
            return lookup(files, &join_path(&base, "__init__.py"));
        }

        return resolve_dotted(&base, rest, files);
    }

    for search_base in PYTHON_SEARCH_BASES {
        if let Some(found) = resolve_dotted(search_base, specifier, files) {
            return Some(found);
        }
    }

    None
}

fn resolve_dotted(base: &str, dotted: &str, files: &HashSet<String>) -> Option<String> {
    let parts: Vec<&str> = dotted.split('.').filter(|p| !p.is_empty()).collect();
    if parts.is_empty() {
        return None;
    }

    let full = join_path(base, &parts.join("/"));
    if let Some(found) = lookup(files, &format!("{}.py", full)) {
        return Some(found);
    }
    if let Some(found) = lookup(files, &join_path(&full, "__init__.py")) {
        return Some(found);
    }

    // 最後一段可能是符號而非模組 (from utils import helper → utils.py)
    if parts.len() > 1 {
        let prefix = join_path(base, &parts[..parts.len() - 1].join("/"));
        if let Some(found) = lookup(files, &format!("{}.py", prefix)) {
            return Some(found);
        }
        if let Some(found) = lookup(files, &join_path(&prefix, "__init__.py")) {
            return Some(found);
        }
    }

    None
}

fn resolve_js_import(
    specifier: &str,
    source_path: &str,
    files: &HashSet<String>,
) -> Option<String> {
    if !specifier.starts_with('.') && !specifier.starts_with('/') {
        // Package import, not a repo file
        return None;
    }

    let target = if let Some(rooted) = specifier.strip_prefix('/') {
        normalize_path("", rooted)?
    } else {
        normalize_path(&parent_dir(source_path), specifier)?
    };

    if let Some(found) = lookup(files, &target) {
        return Some(found);
    }
    for ext in JS_EXTENSIONS {
        if let Some(found) = lookup(files, &format!("{}.{}", target, ext)) {
            return Some(found);
        }
    }
    for ext in JS_EXTENSIONS {
        if let Some(found) = lookup(files, &join_path(&target, &format!("index.{}", ext))) {
            return Some(found);
        }
    }

    None
}

fn resolve_html_ref(
    specifier: &str,
    source_path: &str,
    files: &HashSet<String>,
) -> Option<String> {
    let target = if let Some(rooted) = specifier.strip_prefix('/') {
        normalize_path("", rooted)?
    } else {
        normalize_path(&parent_dir(source_path), specifier)?
    };

    lookup(files, &target)
}

fn lookup(files: &HashSet<String>, candidate: &str) -> Option<String> {
    files.contains(candidate).then(|| candidate.to_string())
}

fn parent_dir(path: &str) -> String {
    match path.rsplit_once('/') {
        Some((dir, _)) => dir.to_string(),
        None => String::new(),
    }
}

fn join_path(base: &str, rest: &str) -> String {
    if base.is_empty() {
        rest.to_string()
    } else {
        format!("{}/{}", base, rest)
    }
}

/// 正規化相對路徑 (處理 ./ 與 ../); 越出 repo 根目錄回傳 None
fn normalize_path(base_dir: &str, relative: &str) -> Option<String> {
    let mut parts: Vec<&str> = if base_dir.is_empty() {
        Vec::new()
    } else {
        base_dir.split('/').collect()
    };

    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.pop().is_none() {
                    return None;
                }
            }
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn dedup_in_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
