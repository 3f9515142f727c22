//! AST parser wrapper using OXC (spec §4.2).

use std::fs;
use std::path::Path;
use std::sync::Arc;

use oxc_allocator::Allocator;
use oxc_parser::{ParseOptions, Parser};
use oxc_span::SourceType;
use parking_lot::RwLock;

use crate::error::{AnalysisError, Result};
use crate::models::dependency::ImportDescriptor;
use crate::models::symbol::CallEdge;

use super::symbol_visitor::{extract, LineIndex, RawSymbol};

/// Thread-safe pool of reusable `Allocator`s, so a long-running parse loop
/// does not allocate a fresh bump arena per file.
pub struct AllocatorPool {
    allocators: Arc<RwLock<Vec<Allocator>>>,
}

impl AllocatorPool {
    pub fn new(size: usize) -> Self {
        let mut allocators = Vec::with_capacity(size);
        for _ in 0..size.max(1) {
            allocators.push(Allocator::default());
        }
        Self { allocators: Arc::new(RwLock::new(allocators)) }
    }

    pub fn take(&self) -> Option<Allocator> {
        self.allocators.write().pop()
    }

    pub fn return_allocator(&self, allocator: Allocator) {
        self.allocators.write().push(allocator);
    }
}

/// Extracted analysis data that does not depend on the allocator's lifetime;
/// safe to return after the allocator goes back into the pool.
#[derive(Debug, Clone)]
pub struct FileAnalysis {
    pub path: String,
    pub language: String,
    pub symbols: Vec<RawSymbol>,
    pub calls: Vec<CallEdge>,
    pub imports: Vec<ImportDescriptor>,
    pub exports: std::collections::HashSet<String>,
    pub has_errors: bool,
    pub source_text: String,
}

pub struct AstParser {
    parse_options: ParseOptions,
    allocator_pool: AllocatorPool,
}

impl AstParser {
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions { parse_regular_expression: true, ..ParseOptions::default() },
            allocator_pool: AllocatorPool::new(num_cpus::get()),
        }
    }

    /// Parses a JS/TS-family file and extracts symbols/calls/imports/exports
    /// immediately, while the allocator backing the AST is still alive.
    pub fn parse_and_analyze(&self, path: &Path, relative_path: &str) -> Result<FileAnalysis> {
        let source_text = fs::read_to_string(path).map_err(AnalysisError::io_error)?;
        let source_type = SourceType::from_path(path).unwrap_or_default();

        let allocator = self.allocator_pool.take().unwrap_or_default();

        let ret = Parser::new(&allocator, &source_text, source_type)
            .with_options(self.parse_options.clone())
            .parse();

        let lines = LineIndex::new(&source_text);
        let (symbols, calls, imports, exports, has_errors) = if ret.errors.is_empty() {
            let extracted = extract(&ret.program, relative_path, &lines);
            (extracted.symbols, extracted.calls, extracted.imports, extracted.exports, false)
        } else {
            (Vec::new(), Vec::new(), Vec::new(), std::collections::HashSet::new(), true)
        };

        self.allocator_pool.return_allocator(allocator);

        Ok(FileAnalysis {
            path: relative_path.to_string(),
            language: language_for_source_type(&source_type),
            symbols,
            calls,
            imports,
            exports,
            has_errors,
            source_text,
        })
    }
}

impl Default for AstParser {
    fn default() -> Self {
        Self::new()
    }
}

fn language_for_source_type(source_type: &SourceType) -> String {
    if source_type.is_typescript() {
        "typescript".to_string()
    } else if source_type.is_jsx() {
        "javascript".to_string()
    } else {
        "javascript".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_extracts_top_level_function() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("test.js");
        fs::write(&file_path, "export function foo() { return bar(); }\nfunction bar() { return 1; }").unwrap();

        let parser = AstParser::new();
        let result = parser.parse_and_analyze(&file_path, "test.js").unwrap();

        assert!(!result.has_errors);
        assert_eq!(result.symbols.len(), 2);
        assert!(result.exports.contains("foo"));
        assert_eq!(result.calls.len(), 1);
    }

    #[test]
    fn test_parse_extracts_import() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("test.js");
        fs::write(&file_path, "import { foo } from './foo.js';\nfoo();").unwrap();

        let parser = AstParser::new();
        let result = parser.parse_and_analyze(&file_path, "test.js").unwrap();

        assert_eq!(result.imports.len(), 1);
        assert_eq!(result.imports[0].specifier, "./foo.js");
        assert!(result.imports[0].names.contains("foo"));
    }
}
