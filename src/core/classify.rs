use crate::domain::model::DependencyType;

// Sorted so membership checks can binary search.
static PYTHON_STDLIB: &[&str] = &[
    "abc",
    "argparse",
    "asyncio",
    "base64",
    "bisect",
    "builtins",
    "calendar",
    "cmd",
    "codecs",
    "collections",
    "concurrent",
    "configparser",
    "contextlib",
    "copy",
    "csv",
    "ctypes",
    "dataclasses",
    "datetime",
    "decimal",
    "difflib",
    "dis",
    "doctest",
    "email",
    "enum",
    "errno",
    "filecmp",
    "fnmatch",
    "fractions",
    "ftplib",
    "functools",
    "gc",
    "getopt",
    "getpass",
    "gettext",
    "glob",
    "gzip",
    "hashlib",
    "heapq",
    "hmac",
    "html",
    "http",
    "imaplib",
    "importlib",
    "inspect",
    "io",
    "ipaddress",
    "itertools",
    "json",
    "keyword",
    "linecache",
    "locale",
    "logging",
    "lzma",
    "mailbox",
    "math",
    "mimetypes",
    "multiprocessing",
    "numbers",
    "operator",
    "optparse",
    "os",
    "pathlib",
    "pdb",
    "pickle",
    "platform",
    "posixpath",
    "pprint",
    "profile",
    "pstats",
    "pty",
    "pwd",
    "py_compile",
    "pydoc",
    "queue",
    "random",
    "re",
    "readline",
    "reprlib",
    "resource",
    "runpy",
    "sched",
    "secrets",
    "select",
    "shelve",
    "shlex",
    "shutil",
    "signal",
    "site",
    "smtplib",
    "socket",
    "sqlite3",
    "ssl",
    "stat",
    "statistics",
    "string",
    "struct",
    "subprocess",
    "symtable",
    "sys",
    "sysconfig",
    "tarfile",
    "telnetlib",
    "tempfile",
    "test",
    "textwrap",
    "threading",
    "time",
    "timeit",
    "token",
    "tokenize",
    "traceback",
    "tty",
    "turtle",
    "types",
    "typing",
    "unicodedata",
    "unittest",
    "urllib",
    "uuid",
    "venv",
    "warnings",
    "wave",
    "weakref",
    "webbrowser",
    "xml",
    "xmlrpc",
    "zipfile",
    "zlib",
    "zoneinfo",
];

static NODE_CORE_MODULES: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// 擷取 import 的頂層模組名稱 (`a.b.c` → `a`, `@scope/pkg/sub` → `@scope/pkg`)
pub fn top_level_module(language: &str, specifier: &str) -> String {
    match language {
        "Python" => specifier
            .split('.')
            .next()
            .unwrap_or(specifier)
            .to_string(),
        "JavaScript" | "TypeScript" => {
            let name = specifier.strip_prefix("node:").unwrap_or(specifier);
            if let Some(rest) = name.strip_prefix('@') {
                // Scoped packages keep @scope/name as the identity
                let mut parts = rest.splitn(3, '/');
                match (parts.next(), parts.next()) {
                    (Some(scope), Some(pkg)) => format!("@{}/{}", scope, pkg),
                    _ => name.to_string(),
                }
            } else {
                name.split('/').next().unwrap_or(name).to_string()
            }
        }
        _ => specifier.to_string(),
    }
}

pub fn classify(language: &str, specifier: &str) -> DependencyType {
    if specifier.is_empty() || specifier.starts_with('.') {
        // Relative specifiers are resolution candidates, not packages
        return DependencyType::Unknown;
    }

    match language {
        "Python" => {
            let module = top_level_module(language, specifier);
            if PYTHON_STDLIB.binary_search(&module.as_str()).is_ok() {
                DependencyType::Stdlib
            } else {
                DependencyType::ThirdParty
            }
        }
        "JavaScript" | "TypeScript" => {
            if specifier.starts_with('/') {
                // Rooted paths are file references, not packages
                return DependencyType::Unknown;
            }
            if specifier.starts_with("node:") {
                return DependencyType::Stdlib;
            }
            let module = top_level_module(language, specifier);
            if NODE_CORE_MODULES.binary_search(&module.as_str()).is_ok() {
                DependencyType::Stdlib
            } else {
                DependencyType::ThirdParty
            }
        }
        "Perl" => DependencyType::ThirdParty,
        _ => DependencyType::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_sorted_for_binary_search() {
        let mut sorted = PYTHON_STDLIB.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, PYTHON_STDLIB);

        let mut sorted = NODE_CORE_MODULES.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, NODE_CORE_MODULES);
    }

    #[test]
    fn test_python_stdlib_classification() {
        assert_eq!(classify("Python", "os"), DependencyType::Stdlib);
        assert_eq!(classify("Python", "os.path"), DependencyType::Stdlib);
        assert_eq!(classify("Python", "collections.abc"), DependencyType::Stdlib);
        assert_eq!(classify("Python", "requests"), DependencyType::ThirdParty);
        assert_eq!(classify("Python", "numpy.linalg"), DependencyType::ThirdParty);
    }

    #[test]
    fn test_node_core_classification() {
        assert_eq!(classify("JavaScript", "fs"), DependencyType::Stdlib);
        assert_eq!(classify("JavaScript", "node:fs"), DependencyType::Stdlib);
        assert_eq!(classify("JavaScript", "path"), DependencyType::Stdlib);
        assert_eq!(classify("JavaScript", "express"), DependencyType::ThirdParty);
        assert_eq!(classify("TypeScript", "lodash/fp"), DependencyType::ThirdParty);
    }

    #[test]
    fn test_scoped_packages_keep_scope_identity() {
        assert_eq!(
            top_level_module("JavaScript", "@babel/core/lib"),
            "@babel/core"
        );
        assert_eq!(
            classify("JavaScript", "@types/node"),
            DependencyType::ThirdParty
        );
    }

    #[test]
    fn test_node_prefix_is_always_stdlib() {
        // node: prefix is explicit even for names missing from the table
        assert_eq!(classify("JavaScript", "node:test"), DependencyType::Stdlib);
    }

    #[test]
    fn test_relative_specifiers_are_unknown() {
        assert_eq!(classify("Python", ".models"), DependencyType::Unknown);
        assert_eq!(classify("JavaScript", "./utils"), DependencyType::Unknown);
    }

    #[test]
    fn test_unrecognized_language_is_unknown() {
        assert_eq!(classify("COBOL", "anything"), DependencyType::Unknown);
    }

    #[test]
    fn test_python_top_level_extraction() {
        assert_eq!(top_level_module("Python", "a.b.c"), "a");
        assert_eq!(top_level_module("Python", "os"), "os");
    }
}
