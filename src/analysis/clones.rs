//! Near-duplicate function detection: token k-gram winnowing with a Dice-
//! coefficient fallback (spec §4.4). No direct teacher precedent; grounded
//! directly in the winnowing (Schleimer/Aiken "Winnowing: Local Algorithms
//! for Document Fingerprinting") and Moss-style token-shingling approach the
//! spec's own pseudocode describes.

use std::collections::HashMap;

use rayon::prelude::*;
use regex::Regex;

use crate::language::normalize_language;
use crate::models::clone::{CloneEntry, CloneMap};
use crate::models::config::Settings;
use crate::models::metrics::round2;
use crate::models::symbol::Symbol;

const MIN_TOKENS: usize = 5;
const HASH_MODULUS: u64 = 1_000_003;

struct Candidate<'a> {
    #[allow(dead_code)]
    idx: usize,
    symbol: &'a Symbol,
    tokens: Vec<String>,
    /// Byte `(offset, length)` of each token in `symbol.text`, parallel to
    /// `tokens` (spec §4.4 step 2: "Record for each token its byte offset
    /// and length in the original text").
    token_offsets: Vec<(usize, usize)>,
    /// Sorted byte offsets of every `\n` in `symbol.text`, used to map a
    /// token's byte offset back to a line number (spec §4.4's
    /// "symbol's precomputed line-offset table").
    newline_offsets: Vec<usize>,
    token_counts: HashMap<String, usize>,
    fingerprints: Vec<(usize, u64)>,
    language_family: Option<String>,
}

impl Candidate<'_> {
    /// Maps a token's starting byte offset to a 1-based absolute line number
    /// within the symbol's enclosing file.
    fn line_for_token(&self, token_idx: usize) -> usize {
        let (byte_offset, _) = self.token_offsets[token_idx];
        let line_within_symbol = self.newline_offsets.partition_point(|&n| n < byte_offset);
        (self.symbol.start_line + line_within_symbol).min(self.symbol.end_line)
    }
}

pub struct CloneDetector {
    token_re: Regex,
}

impl CloneDetector {
    pub fn new() -> Self {
        Self { token_re: Regex::new(r"[A-Za-z0-9_]+").unwrap() }
    }

    /// Runs clone detection over every function-like symbol in `symbols`
    /// (spec §4.4). Returns the bidirectional `sourceId -> [CloneEntry]` map.
    pub fn detect(&self, symbols: &[Symbol], settings: &Settings) -> CloneMap {
        let candidates: Vec<Candidate> = symbols
            .iter()
            .enumerate()
            .filter(|(_, s)| s.kind.is_function_like())
            .filter_map(|(idx, symbol)| self.build_candidate(idx, symbol, settings))
            .collect();

        if candidates.len() < 2 {
            return CloneMap::new();
        }

        // hash -> candidate indices (index into `candidates`, capped per
        // spec §4.4 "fingerprint index capped at 64 entries per hash").
        let mut index: HashMap<u64, Vec<usize>> = HashMap::new();
        for (i, candidate) in candidates.iter().enumerate() {
            for &(_, hash) in &candidate.fingerprints {
                let bucket = index.entry(hash).or_default();
                if bucket.len() < 64 && !bucket.contains(&i) {
                    bucket.push(i);
                }
            }
        }

        let mut pairs: Vec<(usize, usize)> = Vec::new();
        let mut seen_pairs: std::collections::HashSet<(usize, usize)> = std::collections::HashSet::new();
        'outer: for bucket in index.values() {
            if bucket.len() < 2 {
                continue;
            }
            for i in 0..bucket.len() {
                for j in (i + 1)..bucket.len() {
                    let (a, b) = (bucket[i].min(bucket[j]), bucket[i].max(bucket[j]));
                    if seen_pairs.insert((a, b)) {
                        pairs.push((a, b));
                        if pairs.len() >= settings.clone_max_pairs {
                            break 'outer;
                        }
                    }
                }
            }
        }

        let compare = |&(a, b): &(usize, usize)| -> Option<(String, CloneEntry, String, CloneEntry)> {
            let ca = &candidates[a];
            let cb = &candidates[b];
            // Spec §4.4: "only compare symbols whose normalized languages
            // match (null languages are permissive)" — a missing language on
            // either side is treated as compatible, not exclusionary.
            let compatible = match (&ca.language_family, &cb.language_family) {
                (None, _) | (_, None) => true,
                (Some(la), Some(lb)) => la == lb,
            };
            if !compatible {
                return None;
            }
            let (a_to_b, b_to_a) = self.compare_pair(ca, cb, settings)?;
            Some((ca.symbol.id.clone(), a_to_b, cb.symbol.id.clone(), b_to_a))
        };

        let results: Vec<(String, CloneEntry, String, CloneEntry)> = if settings.parallel {
            pairs.par_iter().filter_map(compare).collect()
        } else {
            pairs.iter().filter_map(compare).collect()
        };

        let mut clones: CloneMap = CloneMap::new();
        for (a_id, a_to_b, b_id, b_to_a) in results {
            clones.entry(a_id).or_default().push(a_to_b);
            clones.entry(b_id).or_default().push(b_to_a);
        }

        clones
    }

    fn build_candidate<'a>(
        &self,
        idx: usize,
        symbol: &'a Symbol,
        settings: &Settings,
    ) -> Option<Candidate<'a>> {
        let stripped = strip_comments(&symbol.text);
        let mut tokens: Vec<String> = Vec::new();
        let mut token_offsets: Vec<(usize, usize)> = Vec::new();
        for m in self.token_re.find_iter(&stripped) {
            let text = m.as_str().to_lowercase();
            if text == "_" {
                continue;
            }
            token_offsets.push((m.start(), m.len()));
            tokens.push(text);
        }
        tokens.truncate(settings.clone_max_tokens);
        token_offsets.truncate(settings.clone_max_tokens);

        if tokens.len() < MIN_TOKENS {
            return None;
        }

        let mut token_counts: HashMap<String, usize> = HashMap::new();
        for t in &tokens {
            *token_counts.entry(t.clone()).or_insert(0) += 1;
        }

        let newline_offsets: Vec<usize> = symbol
            .text
            .bytes()
            .enumerate()
            .filter_map(|(i, b)| (b == b'\n').then_some(i))
            .collect();

        let hashes = kgram_hashes(&tokens, settings.clone_shingle_size);
        let fingerprints = winnow(&hashes, settings.clone_window_size);

        Some(Candidate {
            idx,
            symbol,
            tokens,
            token_offsets,
            newline_offsets,
            token_counts,
            fingerprints,
            language_family: normalize_language(symbol.language.as_deref()),
        })
    }

    fn compare_pair(
        &self,
        a: &Candidate,
        b: &Candidate,
        settings: &Settings,
    ) -> Option<(CloneEntry, CloneEntry)> {
        let shared: std::collections::HashSet<u64> = a
            .fingerprints
            .iter()
            .map(|&(_, h)| h)
            .filter(|h| b.fingerprints.iter().any(|&(_, bh)| bh == *h))
            .collect();

        let segment_similarity = if !shared.is_empty() {
            self.segment_similarity(a, b, &shared, settings)
        } else {
            None
        };

        let dice = dice_coefficient(&a.token_counts, &b.token_counts);
        let similarity = round2(segment_similarity.unwrap_or(0.0).max(dice));

        if similarity < settings.clone_similarity_threshold {
            return None;
        }

        let (a_range, b_range) = if let Some(ranges) = self.matched_ranges(a, b, &shared, settings) {
            ranges
        } else {
            ((a.symbol.start_line, a.symbol.end_line), (b.symbol.start_line, b.symbol.end_line))
        };

        let a_to_b = CloneEntry {
            target_id: b.symbol.id.clone(),
            file_path: b.symbol.path.clone(),
            start_line: b_range.0,
            end_line: b_range.1,
            similarity,
        };
        let b_to_a = CloneEntry {
            target_id: a.symbol.id.clone(),
            file_path: a.symbol.path.clone(),
            start_line: a_range.0,
            end_line: a_range.1,
            similarity,
        };

        Some((a_to_b, b_to_a))
    }

    /// Ratio of tokens covered by shared-fingerprint k-grams to the longer
    /// symbol's token count (spec §4.4: `overlapTokens / max(|tokensA|,
    /// |tokensB|)`), bounded by `clone_max_matches_per_pair` anchors.
    fn segment_similarity(
        &self,
        a: &Candidate,
        b: &Candidate,
        shared: &std::collections::HashSet<u64>,
        settings: &Settings,
    ) -> Option<f64> {
        let k = settings.clone_shingle_size;
        let mut covered_a: Vec<bool> = vec![false; a.tokens.len()];
        let mut anchors_used = 0;

        for &(pos_a, hash) in &a.fingerprints {
            if anchors_used >= settings.clone_max_matches_per_pair {
                break;
            }
            if !shared.contains(&hash) {
                continue;
            }
            for &(pos_b, hash_b) in &b.fingerprints {
                if hash_b != hash {
                    continue;
                }
                if a.tokens.get(pos_a..pos_a + k) != b.tokens.get(pos_b..pos_b + k) {
                    continue;
                }
                let (start, end) = extend_match(&a.tokens, &b.tokens, pos_a, pos_b, k);
                for i in start..end {
                    if i < covered_a.len() {
                        covered_a[i] = true;
                    }
                }
                anchors_used += 1;
                break;
            }
        }

        let covered = covered_a.iter().filter(|&&c| c).count();
        let denom = a.tokens.len().max(b.tokens.len());
        if denom == 0 {
            return None;
        }
        Some((covered as f64 / denom as f64).min(1.0))
    }

    /// Picks the longest matched anchor and returns its line range in each
    /// file, for clone-entry reporting.
    fn matched_ranges(
        &self,
        a: &Candidate,
        b: &Candidate,
        shared: &std::collections::HashSet<u64>,
        settings: &Settings,
    ) -> Option<((usize, usize), (usize, usize))> {
        let k = settings.clone_shingle_size;
        let mut best: Option<(usize, usize, usize, usize)> = None; // a_start,a_end,b_start,b_end

        for &(pos_a, hash) in &a.fingerprints {
            if !shared.contains(&hash) {
                continue;
            }
            for &(pos_b, hash_b) in &b.fingerprints {
                if hash_b != hash {
                    continue;
                }
                if a.tokens.get(pos_a..pos_a + k) != b.tokens.get(pos_b..pos_b + k) {
                    continue;
                }
                let (a_start, a_end) = extend_match(&a.tokens, &b.tokens, pos_a, pos_b, k);
                let b_start = pos_b.saturating_sub(pos_a - a_start);
                let b_end = pos_b + k + (a_end - (pos_a + k));
                let len = a_end - a_start;
                if best.map(|(s, e, _, _)| len > e - s).unwrap_or(true) {
                    best = Some((a_start, a_end, b_start, b_end));
                }
            }
        }

        let (a_start, a_end, b_start, b_end) = best?;
        let a_lines = (a.line_for_token(a_start), a.line_for_token(a_end.saturating_sub(1).max(a_start)));
        let b_lines = (b.line_for_token(b_start), b.line_for_token(b_end.saturating_sub(1).max(b_start)));
        Some((a_lines, b_lines))
    }
}

impl Default for CloneDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn extend_match(a: &[String], b: &[String], pos_a: usize, pos_b: usize, k: usize) -> (usize, usize) {
    let mut start_a = pos_a;
    let mut start_b = pos_b;
    while start_a > 0 && start_b > 0 && a[start_a - 1] == b[start_b - 1] {
        start_a -= 1;
        start_b -= 1;
    }

    let mut end_a = pos_a + k;
    let mut end_b = pos_b + k;
    while end_a < a.len() && end_b < b.len() && a[end_a] == b[end_b] {
        end_a += 1;
        end_b += 1;
    }

    (start_a, end_a)
}

fn kgram_hashes(tokens: &[String], k: usize) -> Vec<u64> {
    if tokens.len() < k {
        return Vec::new();
    }
    (0..=(tokens.len() - k)).map(|i| hash_kgram(tokens, i, k)).collect()
}

fn hash_kgram(tokens: &[String], start: usize, k: usize) -> u64 {
    let mut hash: u64 = 0;
    for offset in 0..k {
        for b in tokens[start + offset].bytes() {
            hash = (hash.wrapping_mul(31).wrapping_add(b as u64)) % HASH_MODULUS;
        }
        if offset + 1 < k {
            hash = (hash.wrapping_mul(131).wrapping_add(1)) % HASH_MODULUS;
        }
    }
    hash
}

/// Winnowing (spec §4.4): slides a window of `w` k-gram hashes, keeping the
/// minimum in each window (latest index wins ties), skipping consecutive
/// duplicate selections. Falls back to the single global minimum when the
/// hash stream is no longer than the window.
fn winnow(hashes: &[u64], w: usize) -> Vec<(usize, u64)> {
    if hashes.is_empty() {
        return Vec::new();
    }
    if hashes.len() <= w || w == 0 {
        let mut best = 0;
        for i in 1..hashes.len() {
            if hashes[i] <= hashes[best] {
                best = i;
            }
        }
        return vec![(best, hashes[best])];
    }

    let mut fingerprints = Vec::new();
    let mut last_selected: Option<usize> = None;
    for start in 0..=(hashes.len() - w) {
        let window = &hashes[start..start + w];
        let mut best_local = 0;
        for i in 1..window.len() {
            if window[i] <= window[best_local] {
                best_local = i;
            }
        }
        let pos = start + best_local;
        if last_selected != Some(pos) {
            fingerprints.push((pos, hashes[pos]));
            last_selected = Some(pos);
        }
    }
    fingerprints
}

/// `2*sum(min(countA, countB)) / (|A| + |B|)` over token multisets.
fn dice_coefficient(a: &HashMap<String, usize>, b: &HashMap<String, usize>) -> f64 {
    let len_a: usize = a.values().sum();
    let len_b: usize = b.values().sum();
    if len_a + len_b == 0 {
        return 0.0;
    }
    let mut shared = 0usize;
    for (token, &count_a) in a {
        if let Some(&count_b) = b.get(token) {
            shared += count_a.min(count_b);
        }
    }
    round2((2.0 * shared as f64) / (len_a + len_b) as f64)
}

/// Strips `//` and `/* */` comments, replacing their interior bytes with
/// spaces so token offsets and line structure survive (ASCII delimiters
/// never collide with UTF-8 continuation bytes).
fn strip_comments(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = vec![0u8; bytes.len()];
    out.copy_from_slice(bytes);

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'/' {
            let mut j = i;
            while j < bytes.len() && bytes[j] != b'\n' {
                out[j] = b' ';
                j += 1;
            }
            i = j;
        } else if bytes[i] == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'*' {
            let mut j = i;
            while j + 1 < bytes.len() && !(bytes[j] == b'*' && bytes[j + 1] == b'/') {
                if bytes[j] != b'\n' {
                    out[j] = b' ';
                }
                j += 1;
            }
            if j + 1 < bytes.len() {
                out[j] = b' ';
                out[j + 1] = b' ';
                j += 2;
            } else {
                out[j] = b' ';
                j += 1;
            }
            i = j;
        } else {
            i += 1;
        }
    }

    String::from_utf8(out).unwrap_or_else(|_| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::symbol::SymbolKind;

    fn make_symbol(id: &str, path: &str, text: &str) -> Symbol {
        Symbol {
            id: id.to_string(),
            file_id: format!("file:{}", path),
            name: id.to_string(),
            kind: SymbolKind::Function,
            path: path.to_string(),
            language: Some("javascript".into()),
            start_line: 1,
            end_line: text.lines().count().max(1),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_detects_near_identical_functions() {
        let body = "function sum(list) { let total = 0; for (const n of list) { total += n; } return total; }";
        let a = make_symbol("function:a.js#sum", "a.js", body);
        let b = make_symbol("function:b.js#sumAll", "b.js", body);

        let detector = CloneDetector::new();
        let settings = Settings::default();
        let clones = detector.detect(&[a, b], &settings);

        assert!(clones.contains_key("function:a.js#sum"));
        assert!(clones.contains_key("function:b.js#sumAll"));
        let entry = &clones["function:a.js#sum"][0];
        assert!(entry.similarity >= settings.clone_similarity_threshold);
    }

    #[test]
    fn test_clone_entry_line_range_stays_within_symbol_bounds() {
        let body = "function sum(list) {\n  let total = 0;\n  for (const n of list) {\n    total += n;\n  }\n  return total;\n}";
        let a = make_symbol("function:a.js#sum", "a.js", body);
        let b = make_symbol("function:b.js#sumAll", "b.js", body);

        let detector = CloneDetector::new();
        let settings = Settings::default();
        let clones = detector.detect(&[a, b], &settings);

        let entry = &clones["function:a.js#sum"][0];
        assert!(entry.start_line >= 1 && entry.start_line <= entry.end_line);
        assert!(entry.end_line <= body.lines().count());
    }

    #[test]
    fn test_unrelated_functions_not_flagged() {
        let a = make_symbol("function:a.js#foo", "a.js", "function foo() { return 1; }");
        let b = make_symbol(
            "function:b.js#bar",
            "b.js",
            "function bar(stream) { stream.pipe(process.stdout); stream.on('error', console.error); }",
        );

        let detector = CloneDetector::new();
        let settings = Settings::default();
        let clones = detector.detect(&[a, b], &settings);
        assert!(clones.is_empty());
    }

    #[test]
    fn test_dice_coefficient_identical_sets() {
        let mut a = HashMap::new();
        a.insert("x".to_string(), 3);
        let mut b = HashMap::new();
        b.insert("x".to_string(), 3);
        assert_eq!(dice_coefficient(&a, &b), 1.0);
    }

    #[test]
    fn test_winnow_global_fallback_short_stream() {
        let hashes = vec![5, 2, 8];
        let result = winnow(&hashes, 10);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].1, 2);
    }

    #[test]
    fn test_strip_comments_preserves_line_count() {
        let text = "a();\n// comment\nb(); /* inline */ c();\n";
        let stripped = strip_comments(text);
        assert_eq!(text.lines().count(), stripped.lines().count());
        assert!(!stripped.contains("comment"));
        assert!(!stripped.contains("inline"));
    }
}
