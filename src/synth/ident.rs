//! Identifier normalization for generated accessors
//!
//! An entity name becomes a legal snake_case identifier: lowercased, with
//! namespace separators and dashes rewritten to underscores. Normalization is
//! lossy, so two distinct entity names can collide; the synthesizer treats
//! that as a fatal condition rather than inventing a disambiguation.

/// Rust keywords an accessor identifier must not shadow
const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
];

/// Normalize an entity name into a legal identifier.
///
/// Lowercases the name and rewrites `:` and `-` (and any other character that
/// cannot appear in an identifier) to `_`. A leading digit is prefixed and a
/// keyword is suffixed with an underscore.
pub fn normalize_identifier(name: &str) -> String {
    let mut ident: String = name
        .trim()
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if ident.is_empty() {
        ident.push('_');
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}
