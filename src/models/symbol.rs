//! Symbol model (spec §3 `Symbol`, §4.2).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Component,
    Class,
    Value,
    /// Fallback whole-file symbol emitted when no AST pass ran.
    File,
}

impl SymbolKind {
    /// Function-like symbols are the only ones the clone detector considers.
    pub fn is_function_like(self) -> bool {
        matches!(self, SymbolKind::Function | SymbolKind::Component)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    /// Stable structured id: `"{kind}:{filePath}#{name}"`.
    pub id: String,
    pub file_id: String,
    pub name: String,
    pub kind: SymbolKind,
    pub path: String,
    pub language: Option<String>,
    pub start_line: usize,
    pub end_line: usize,
    /// Dropped from the final report before emission; retained here only to
    /// feed the smell detector and clone detector during the pipeline run.
    #[serde(skip_serializing)]
    pub text: String,
}

impl Symbol {
    pub fn id_for(kind: SymbolKind, path: &str, name: &str) -> String {
        format!("{}:{}#{}", kind_str(kind), path, name)
    }

    pub fn file_fallback_id(path: &str) -> String {
        format!("file:{}#__file__", path)
    }
}

fn kind_str(kind: SymbolKind) -> &'static str {
    match kind {
        SymbolKind::Function => "function",
        SymbolKind::Component => "component",
        SymbolKind::Class => "class",
        SymbolKind::Value => "value",
        SymbolKind::File => "file",
    }
}

/// Applies the component-vs-function capitalization rule (spec §3):
/// `kind=component` is assigned when `kind` would be `function` and `name`
/// begins with an uppercase letter. Classes always keep `kind=class`.
pub fn classify_function_like(name: &str) -> SymbolKind {
    if name.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) {
        SymbolKind::Component
    } else {
        SymbolKind::Function
    }
}

/// An intra-file call edge captured during the symbol-visitor AST walk
/// (spec §4.2 "Intra-file calls").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEdge {
    pub caller: String,
    pub callee: String,
}
