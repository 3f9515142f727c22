//! Extension-to-language mapping shared by metrics, dependency resolution,
//! and the clone detector's language-compatibility check (spec §4.4).

/// Returns a human-readable language name for a lowercased file extension
/// (no leading dot), or `None` for unrecognized extensions.
pub fn language_for_ext(ext: &str) -> Option<&'static str> {
    Some(match ext {
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "javascript",
        "ts" => "typescript",
        "tsx" => "typescript",
        "py" => "python",
        "go" => "go",
        "rs" => "rust",
        "java" => "java",
        "rb" => "ruby",
        "php" => "php",
        "c" => "c",
        "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" => "cpp",
        "cs" => "csharp",
        "json" => "json",
        "md" => "markdown",
        "yml" | "yaml" => "yaml",
        "toml" => "toml",
        "html" => "html",
        "css" => "css",
        "sh" => "shell",
        _ => return None,
    })
}

/// True for the extensions the spec requires a real AST pass for (§4.2).
pub fn is_js_family_ext(ext: &str) -> bool {
    matches!(ext, "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx")
}

/// Normalizes a language name for clone-detector compatibility checks (spec
/// §4.4): the JS/TS family collapses to `"js-family"`; everything else is
/// lowercased as-is.
pub fn normalize_language(language: Option<&str>) -> Option<String> {
    language.map(|lang| {
        let lower = lang.to_lowercase();
        match lower.as_str() {
            "javascript" | "typescript" | "js" | "ts" | "jsx" | "tsx" => "js-family".to_string(),
            other => other.to_string(),
        }
    })
}
