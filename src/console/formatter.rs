use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern regex is valid"));

// Applied in order. Later rules see the output of earlier ones, so e.g. the
// LEFT JOIN rule never fires once JOIN has been broken onto its own line.
const KEYWORD_RULES: &[(&str, &str)] = &[
    ("SELECT", "SELECT"),
    ("FROM", "\nFROM"),
    ("WHERE", "\nWHERE"),
    ("JOIN", "\nJOIN"),
    ("LEFT JOIN", "\nLEFT JOIN"),
    ("INNER JOIN", "\nINNER JOIN"),
    ("GROUP BY", "\nGROUP BY"),
    ("ORDER BY", "\nORDER BY"),
    ("HAVING", "\nHAVING"),
    ("LIMIT", "\nLIMIT"),
    ("AND", "\n  AND"),
    ("OR", "\n  OR"),
];

static KEYWORD_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    KEYWORD_RULES
        .iter()
        .map(|(keyword, replacement)| {
            let pattern =
                Regex::new(&format!("(?i){}", keyword)).expect("keyword pattern regex is valid");
            (pattern, *replacement)
        })
        .collect()
});

/// Cosmetic line-breaking of SQL text.
///
/// This is plain text substitution: keywords are matched anywhere, including
/// inside identifiers and string literals, and the result is not guaranteed to
/// mean the same thing as the input.
pub fn format_sql(text: &str) -> String {
    let mut sql = WHITESPACE.replace_all(text, " ").into_owned();
    for (pattern, replacement) in KEYWORD_PATTERNS.iter() {
        sql = pattern.replace_all(&sql, *replacement).into_owned();
    }
    sql.trim().to_string()
}
