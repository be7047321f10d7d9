//! Text normalization helpers shared by corpus creators.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

static PUNCT_SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{P}\p{S}]").expect("punctuation class is valid"));
static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9(),!?'`]").expect("word pattern is valid"));
static CONTRACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"('s|'ve|n't|'re|'d|'ll)").expect("contraction pattern is valid"));
static SPLIT_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([,!()?])").expect("punctuation pattern is valid"));

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_inline_whitespace<T: AsRef<str>>(text: T) -> String {
    let mut normalized = String::new();
    let mut seen_space = false;
    for ch in text.as_ref().chars() {
        if ch.is_whitespace() {
            if !seen_space {
                normalized.push(' ');
                seen_space = true;
            }
        } else {
            normalized.push(ch);
            seen_space = false;
        }
    }
    normalized.trim().to_string()
}

/// Visible text of an HTML fragment, with character references decoded.
///
/// Text nodes are concatenated in document order without separators, so markup
/// inside a word (`Java<b>Script</b>`) joins back up. Script and style bodies and
/// comments are dropped. Text with no `<` or `&` comes back unchanged.
pub fn clean_html(text: &str) -> String {
    if !text.contains(['<', '&']) {
        return text.to_string();
    }
    let fragment = Html::parse_fragment(text);
    let mut visible = String::with_capacity(text.len());
    for node in fragment.root_element().descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .is_some_and(|element| matches!(element.name(), "script" | "style"));
        if !hidden {
            visible.push_str(chunk);
        }
    }
    visible
}

/// Markup-free, whitespace-collapsed text with newlines folded into spaces.
pub fn clean_field_text(text: &str) -> String {
    normalize_inline_whitespace(clean_html(text))
}

/// Lowercase text and remove punctuation, after stripping markup.
///
/// Every character in the Unicode punctuation (`P*`) and symbol (`S*`) categories is
/// dropped; letters, digits, and marks are kept. Whitespace collapses to single spaces.
pub fn lowercase_strip_punc(text: &str) -> String {
    let markup_free = clean_html(text);
    let stripped = PUNCT_SYMBOL_RE.replace_all(&markup_free, "");
    normalize_inline_whitespace(stripped.to_lowercase())
}

/// Word2vec-style cleaning for training text.
///
/// Markup is stripped, anything outside `[A-Za-z0-9(),!?'`]` becomes a space,
/// contractions and `, ! ( ) ?` are split off as their own tokens, and the result is
/// lowercased with single spaces.
pub fn clean_str(text: &str) -> String {
    let markup_free = clean_html(text);
    let words_only = NON_WORD_RE.replace_all(&markup_free, " ");
    let contractions = CONTRACTION_RE.replace_all(&words_only, " $1");
    let punctuation = SPLIT_PUNCT_RE.replace_all(&contractions, " $1 ");
    normalize_inline_whitespace(punctuation).to_lowercase()
}

/// Split text on whitespace into owned tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
