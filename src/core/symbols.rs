use crate::core::imports::strip_c_style_comments;
use crate::domain::model::SymbolInfo;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// 低階語言符號擷取層級
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolSupport {
    /// 結構完整擷取 (組語指示詞是語法的一部分)
    Full,
    /// 正規表示式啟發式擷取, 清單可能不完整
    Basic,
    /// 不支援
    None,
}

pub fn support_for(language: &str) -> SymbolSupport {
    match language {
        "Assembly" => SymbolSupport::Full,
        "C" | "C++" | "Rust" | "Perl" => SymbolSupport::Basic,
        _ => SymbolSupport::None,
    }
}

pub fn support_warning(language: &str) -> Option<String> {
    match support_for(language) {
        SymbolSupport::Full => None,
        SymbolSupport::Basic => Some(format!(
            "{} symbols extracted heuristically; lists may be incomplete",
            language
        )),
        SymbolSupport::None => Some(format!("No symbol extractor for {}", language)),
    }
}

/// 依語言分派符號擷取; 不支援的語言回傳 None
pub fn extract_symbols(language: &str, content: &str) -> Option<SymbolInfo> {
    let mut symbols = match language {
        "Assembly" => extract_assembly_symbols(content),
        "Perl" => extract_perl_symbols(content),
        "C" | "C++" => extract_c_cpp_symbols(content),
        "Rust" => extract_rust_symbols(content),
        _ => return None,
    };

    if let Some(warning) = support_warning(language) {
        symbols.warnings.push(warning);
    }
    Some(symbols)
}

/// 組語符號: gas .globl/.global 與 .type, NASM global, MASM PUBLIC, 一般標籤
pub fn extract_assembly_symbols(content: &str) -> SymbolInfo {
    let globl_re = Regex::new(r"(?m)^\s*\.glob(?:al|l)\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap();
    let type_re =
        Regex::new(r"(?m)^\s*\.type\s+([A-Za-z_][A-Za-z0-9_]*)\s*,\s*[@%](function|object)")
            .unwrap();
    let nasm_global_re = Regex::new(r"(?mi)^\s*global\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap();
    let masm_public_re = Regex::new(r"(?mi)^\s*PUBLIC\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap();
    let label_re = Regex::new(r"(?m)^\s*([A-Za-z_][A-Za-z0-9_]*):(?:\s|$)").unwrap();

    let mut symbols = SymbolInfo::default();
    let mut seen: HashSet<String> = HashSet::new();

    // .type 注記決定符號是函式還是資料
    let mut type_annotations: HashMap<String, String> = HashMap::new();
    for caps in type_re.captures_iter(content) {
        type_annotations.insert(caps[1].to_string(), caps[2].to_string());
    }

    for caps in globl_re.captures_iter(content) {
        let symbol = caps[1].to_string();
        if seen.insert(symbol.clone()) {
            symbols.asm_labels.push(format!(".globl {}", symbol));
            match type_annotations.get(&symbol).map(String::as_str) {
                Some("function") => symbols.functions.push(symbol),
                Some(_) => symbols.variables.push(symbol),
                None => {}
            }
        }
    }

    for caps in nasm_global_re.captures_iter(content) {
        let symbol = caps[1].to_string();
        if seen.insert(symbol.clone()) {
            symbols.asm_labels.push(format!("global {}", symbol));
        }
    }

    for caps in masm_public_re.captures_iter(content) {
        let symbol = caps[1].to_string();
        if seen.insert(symbol.clone()) {
            symbols.asm_labels.push(format!("PUBLIC {}", symbol));
        }
    }

    // 未被指示詞涵蓋的標籤視為區域標籤
    for caps in label_re.captures_iter(content) {
        let label = caps[1].to_string();
        if seen.contains(&label) {
            continue;
        }
        match type_annotations.get(&label).map(String::as_str) {
            Some("function") => symbols.functions.push(label.clone()),
            Some(_) => symbols.variables.push(label.clone()),
            None => symbols.asm_labels.push(format!("label {}", label)),
        }
        seen.insert(label);
    }

    symbols
}

/// Perl 符號: sub 宣告, package 宣告, 頂層 my/our 變數
pub fn extract_perl_symbols(content: &str) -> SymbolInfo {
    let sub_re = Regex::new(r"(?m)^\s*sub\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap();
    let package_re = Regex::new(r"(?m)^\s*package\s+([\w:]+)\s*;").unwrap();
    let var_re = Regex::new(r"(?m)^(my|our)\s+([$@%][A-Za-z_][A-Za-z0-9_]*)").unwrap();

    let mut symbols = SymbolInfo::default();

    for caps in sub_re.captures_iter(content) {
        symbols.functions.push(format!("sub {}", &caps[1]));
    }
    for caps in package_re.captures_iter(content) {
        symbols.classes.push(format!("package {}", &caps[1]));
    }
    for caps in var_re.captures_iter(content) {
        symbols.variables.push(format!("{} {}", &caps[1], &caps[2]));
    }

    symbols
}

const C_STATEMENT_KEYWORDS: &[&str] = &[
    "return", "else", "case", "goto", "throw", "new", "delete", "typedef",
];
const C_CONTROL_KEYWORDS: &[&str] = &["if", "while", "for", "switch", "sizeof"];

/// C/C++ 符號: 函式宣告或定義, struct/class, #define 巨集, extern/static 全域變數
pub fn extract_c_cpp_symbols(content: &str) -> SymbolInfo {
    let content = strip_c_style_comments(content);

    let function_re =
        Regex::new(r"(?m)^\s*(?:[A-Za-z_]\w*[*&]*\s+)+[*&]*([A-Za-z_]\w*)\s*\(").unwrap();
    let struct_re =
        Regex::new(r"(?m)^\s*(?:typedef\s+)?struct\s+([A-Za-z_]\w*)\s*(?:\{|$)").unwrap();
    let class_re = Regex::new(r"(?m)^\s*class\s+([A-Za-z_]\w*)").unwrap();
    let define_re = Regex::new(r"(?m)^\s*#\s*define\s+([A-Za-z_]\w*)").unwrap();
    let global_re = Regex::new(
        r"(?m)^\s*(?:extern|static)\s+(?:[A-Za-z_]\w*[*&]*\s+)+[*&]*([A-Za-z_]\w*)\s*(?:=|;|\[)",
    )
    .unwrap();

    let mut symbols = SymbolInfo::default();

    for caps in function_re.captures_iter(&content) {
        let name = &caps[1];
        let first_token = caps[0].split_whitespace().next().unwrap_or("");
        if C_STATEMENT_KEYWORDS.contains(&first_token) || C_CONTROL_KEYWORDS.contains(&name) {
            continue;
        }
        symbols.functions.push(format!("function {}", name));
    }
    for caps in struct_re.captures_iter(&content) {
        symbols.classes.push(format!("struct {}", &caps[1]));
    }
    for caps in class_re.captures_iter(&content) {
        symbols.classes.push(format!("class {}", &caps[1]));
    }
    for caps in define_re.captures_iter(&content) {
        symbols.variables.push(format!("#define {}", &caps[1]));
    }
    for caps in global_re.captures_iter(&content) {
        symbols.variables.push(format!("global {}", &caps[1]));
    }

    symbols
}

/// Rust 符號: fn, struct/enum/trait, impl 區塊, const/static
pub fn extract_rust_symbols(content: &str) -> SymbolInfo {
    let content = strip_c_style_comments(content);

    let fn_re = Regex::new(
        r#"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?(?:(?:async|unsafe|const|extern\s+"[^"]*")\s+)*fn\s+([A-Za-z_]\w*)"#,
    )
    .unwrap();
    let struct_re =
        Regex::new(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?struct\s+([A-Za-z_]\w*)").unwrap();
    let enum_re = Regex::new(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?enum\s+([A-Za-z_]\w*)").unwrap();
    let trait_re = Regex::new(
        r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?(?:unsafe\s+)?trait\s+([A-Za-z_]\w*)",
    )
    .unwrap();
    let impl_re = Regex::new(r"(?m)^\s*impl(?:\s*<[^>]*>)?\s+(.+?)\s*\{").unwrap();
    let const_re =
        Regex::new(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?const\s+([A-Za-z_]\w*)\s*:").unwrap();
    let static_re = Regex::new(
        r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?static\s+(?:mut\s+)?([A-Za-z_]\w*)\s*:",
    )
    .unwrap();

    let mut symbols = SymbolInfo::default();

    for caps in fn_re.captures_iter(&content) {
        symbols.functions.push(format!("fn {}", &caps[1]));
    }
    for caps in struct_re.captures_iter(&content) {
        symbols.classes.push(format!("struct {}", &caps[1]));
    }
    for caps in enum_re.captures_iter(&content) {
        symbols.classes.push(format!("enum {}", &caps[1]));
    }
    for caps in trait_re.captures_iter(&content) {
        symbols.classes.push(format!("trait {}", &caps[1]));
    }
    for caps in impl_re.captures_iter(&content) {
        symbols.classes.push(format!("impl {}", &caps[1]));
    }
    for caps in const_re.captures_iter(&content) {
        symbols.variables.push(format!("const {}", &caps[1]));
    }
    for caps in static_re.captures_iter(&content) {
        symbols.variables.push(format!("static {}", &caps[1]));
    }

    symbols
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_function_declarations() {
        let content = r#"
int add(int a, int b) {
    return a + b;
}

void print_hello() {
    printf("Hello");
}

static inline int helper(void) {
    return 0;
}
"#;
        let symbols = extract_c_cpp_symbols(content);
        assert!(symbols.functions.contains(&"function add".to_string()));
        assert!(symbols.functions.contains(&"function print_hello".to_string()));
        assert!(symbols.functions.contains(&"function helper".to_string()));
    }

    #[test]
    fn test_c_header_prototypes() {
        let content = "int add(int a, int b);\nvoid print_hello(void);\n";
        let symbols = extract_c_cpp_symbols(content);
        assert!(symbols.functions.contains(&"function add".to_string()));
        assert!(symbols.functions.contains(&"function print_hello".to_string()));
    }

    #[test]
    fn test_c_struct_declarations() {
        let content = r#"
struct Point {
    int x;
    int y;
};

struct Node {
    int value;
    struct Node* next;
};
"#;
        let symbols = extract_c_cpp_symbols(content);
        assert!(symbols.classes.contains(&"struct Point".to_string()));
        assert!(symbols.classes.contains(&"struct Node".to_string()));
        // Member declarations like `struct Node* next;` are not type declarations
        assert_eq!(symbols.classes.len(), 2);
    }

    #[test]
    fn test_c_macro_definitions() {
        let content = "#define MAX_SIZE 100\n#define MIN(a, b) ((a) < (b) ? (a) : (b))\n";
        let symbols = extract_c_cpp_symbols(content);
        assert!(symbols.variables.contains(&"#define MAX_SIZE".to_string()));
        assert!(symbols.variables.contains(&"#define MIN".to_string()));
    }

    #[test]
    fn test_c_global_variables() {
        let content = "extern int global_counter;\nstatic int internal_counter = 0;\nextern const char* message;\n";
        let symbols = extract_c_cpp_symbols(content);
        assert!(symbols.variables.contains(&"global global_counter".to_string()));
        assert!(symbols.variables.contains(&"global internal_counter".to_string()));
        assert!(symbols.variables.contains(&"global message".to_string()));
    }

    #[test]
    fn test_c_comments_filtered() {
        let content = r#"
// This is a comment with function fake_func()
/* Another comment
   with void another_fake() */
int real_function() {
    return 1;
}
"#;
        let symbols = extract_c_cpp_symbols(content);
        assert!(symbols.functions.contains(&"function real_function".to_string()));
        assert!(!symbols.functions.contains(&"function fake_func".to_string()));
        assert!(!symbols.functions.contains(&"function another_fake".to_string()));
    }

    #[test]
    fn test_c_strings_with_comment_sequences() {
        let content = r#"
int func() {
    char* str1 = "/* not a comment */";
    char* str2 = "// also not a comment";
    // This is a real comment
    return 1;
}

void another() {
    char c = '/';
}
"#;
        let symbols = extract_c_cpp_symbols(content);
        assert_eq!(
            symbols.functions,
            vec!["function func".to_string(), "function another".to_string()]
        );
    }

    #[test]
    fn test_cpp_class_declarations() {
        let content = "class MyClass {\npublic:\n    void method();\n};\n\nclass TemplateClass {\n    int value;\n};\n";
        let symbols = extract_c_cpp_symbols(content);
        assert!(symbols.classes.contains(&"class MyClass".to_string()));
        assert!(symbols.classes.contains(&"class TemplateClass".to_string()));
    }

    #[test]
    fn test_rust_function_forms() {
        let content = r#"
pub fn main() {
    println!("Hello");
}

fn helper(x: i32) -> i32 {
    x * 2
}

pub async fn async_func() {
}

pub unsafe fn unsafe_func() {
}
"#;
        let symbols = extract_rust_symbols(content);
        assert!(symbols.functions.contains(&"fn main".to_string()));
        assert!(symbols.functions.contains(&"fn helper".to_string()));
        assert!(symbols.functions.contains(&"fn async_func".to_string()));
        assert!(symbols.functions.contains(&"fn unsafe_func".to_string()));
    }

    #[test]
    fn test_rust_type_declarations() {
        let content = "pub struct User {\n    name: String,\n}\n\nenum Color {\n    Red,\n}\n\npub trait Display {\n    fn display(&self);\n}\n";
        let symbols = extract_rust_symbols(content);
        assert!(symbols.classes.contains(&"struct User".to_string()));
        assert!(symbols.classes.contains(&"enum Color".to_string()));
        assert!(symbols.classes.contains(&"trait Display".to_string()));
    }

    #[test]
    fn test_rust_impl_blocks() {
        let content = r#"
impl Display for User {
    fn display(&self) {}
}

impl<T> MyType<T> {
    fn method(&self) {}
}

impl<T: Display> MyTrait for MyType<T> {
    fn trait_method(&self) {}
}

impl lowercase_type {
    fn new() {}
}
"#;
        let symbols = extract_rust_symbols(content);
        assert!(symbols
            .classes
            .contains(&"impl Display for User".to_string()));
        assert!(symbols.classes.iter().any(|c| c.contains("MyType<T>")));
        assert!(symbols.classes.iter().any(|c| c.contains("lowercase_type")));
    }

    #[test]
    fn test_rust_constants() {
        let content = "pub const MAX_USERS: usize = 100;\nconst MIN_VALUE: i32 = 0;\nstatic mut COUNTER: i32 = 0;\n";
        let symbols = extract_rust_symbols(content);
        assert!(symbols.variables.contains(&"const MAX_USERS".to_string()));
        assert!(symbols.variables.contains(&"const MIN_VALUE".to_string()));
        assert!(symbols.variables.contains(&"static COUNTER".to_string()));
    }

    #[test]
    fn test_rust_strings_with_comment_sequences() {
        let content = r#"
fn func() {
    let s = "// not a comment";
    let s2 = "/* also not */";
    // This is a real comment
}

fn another() {
    let byte = b"// byte string";
}
"#;
        let symbols = extract_rust_symbols(content);
        assert_eq!(
            symbols.functions,
            vec!["fn func".to_string(), "fn another".to_string()]
        );
    }

    #[test]
    fn test_asm_gas_globl_directives() {
        let content = ".globl main\n.type main, @function\nmain:\n    push %rbp\n    ret\n\n.globl helper\nhelper:\n    ret\n";
        let symbols = extract_assembly_symbols(content);
        assert!(symbols.asm_labels.contains(&".globl main".to_string()));
        assert!(symbols.asm_labels.contains(&".globl helper".to_string()));
        assert!(symbols.functions.contains(&"main".to_string()));
    }

    #[test]
    fn test_asm_global_spelling() {
        let content = ".global start\n.type start, @function\nstart:\n    ret\n";
        let symbols = extract_assembly_symbols(content);
        assert!(symbols.asm_labels.contains(&".globl start".to_string()));
        assert!(symbols.functions.contains(&"start".to_string()));
    }

    #[test]
    fn test_asm_nasm_directives() {
        let content = "global main\nmain:\n    ret\n\nglobal helper\nhelper:\n    ret\n";
        let symbols = extract_assembly_symbols(content);
        assert!(symbols.asm_labels.contains(&"global main".to_string()));
        assert!(symbols.asm_labels.contains(&"global helper".to_string()));
    }

    #[test]
    fn test_asm_masm_public_directives() {
        let content = "PUBLIC main\nmain PROC\n    ret\nmain ENDP\n\nPUBLIC helper\nhelper PROC\n    ret\nhelper ENDP\n";
        let symbols = extract_assembly_symbols(content);
        assert!(symbols.asm_labels.contains(&"PUBLIC main".to_string()));
        assert!(symbols.asm_labels.contains(&"PUBLIC helper".to_string()));
    }

    #[test]
    fn test_asm_data_objects() {
        let content = ".data\n.globl data_var\n.type data_var, @object\ndata_var:\n    .long 42\n";
        let symbols = extract_assembly_symbols(content);
        assert!(symbols.asm_labels.contains(&".globl data_var".to_string()));
        assert!(symbols.variables.contains(&"data_var".to_string()));
    }

    #[test]
    fn test_asm_local_labels() {
        let content = ".globl main\nmain:\n    jmp local_label\n\nlocal_label:\n    nop\n    ret\n";
        let symbols = extract_assembly_symbols(content);
        assert!(symbols.asm_labels.contains(&".globl main".to_string()));
        assert!(symbols.asm_labels.contains(&"label local_label".to_string()));
    }

    #[test]
    fn test_perl_subs_and_packages() {
        let content = "package MyModule;\n\nsub new {\n    my $class = shift;\n    return bless {}, $class;\n}\n\nsub process {\n    return 1;\n}\n\npackage MyModule::Helper;\n";
        let symbols = extract_perl_symbols(content);
        assert!(symbols.functions.contains(&"sub new".to_string()));
        assert!(symbols.functions.contains(&"sub process".to_string()));
        assert!(symbols.classes.contains(&"package MyModule".to_string()));
        assert!(symbols
            .classes
            .contains(&"package MyModule::Helper".to_string()));
    }

    #[test]
    fn test_perl_top_level_variables() {
        let content = "our $VERSION = '1.0';\nmy @queue;\n\nsub push_item {\n    my $item = shift;\n}\n";
        let symbols = extract_perl_symbols(content);
        assert!(symbols.variables.contains(&"our $VERSION".to_string()));
        assert!(symbols.variables.contains(&"my @queue".to_string()));
        // Lexicals inside subs are not module-level symbols
        assert_eq!(symbols.variables.len(), 2);
    }

    #[test]
    fn test_support_tiers() {
        assert_eq!(support_for("Assembly"), SymbolSupport::Full);
        assert_eq!(support_for("C"), SymbolSupport::Basic);
        assert_eq!(support_for("Rust"), SymbolSupport::Basic);
        assert_eq!(support_for("Markdown"), SymbolSupport::None);

        assert!(support_warning("Assembly").is_none());
        assert!(support_warning("C").is_some_and(|w| w.contains("C")));
    }

    #[test]
    fn test_extract_symbols_dispatch() {
        assert!(extract_symbols("Markdown", "# Title").is_none());

        let symbols = extract_symbols("Rust", "pub fn main() {}").unwrap_or_default();
        assert!(symbols.functions.contains(&"fn main".to_string()));
        assert!(!symbols.warnings.is_empty());

        let symbols = extract_symbols("Assembly", ".globl main\nmain:\n    ret\n")
            .unwrap_or_default();
        assert!(symbols.asm_labels.contains(&".globl main".to_string()));
        assert!(symbols.warnings.is_empty());
    }
}
