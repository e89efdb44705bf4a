//! Centralized validation and helper functions.

/// Bases allowed in a sample index read. `N` is a no-call.
pub const ALLOWED_BASES: [char; 5] = ['A', 'C', 'G', 'T', 'N'];

/// Maximum length accepted for a sample index sequence
pub const MAX_INDEX_LENGTH: usize = 64;

/// Check whether a character is an allowed index base.
///
/// # Examples
///
/// ```
/// use seq_reconcile::utils::validation::is_valid_base;
///
/// assert!(is_valid_base('N'));
/// assert!(!is_valid_base('a'));
/// assert!(!is_valid_base('U'));
/// ```
#[must_use]
pub fn is_valid_base(c: char) -> bool {
    ALLOWED_BASES.contains(&c)
}

/// Return the first character of `seq` that is not an allowed base, if any.
#[must_use]
pub fn first_invalid_base(seq: &str) -> Option<char> {
    seq.chars().find(|c| !is_valid_base(*c))
}

/// Normalize text read from a spreadsheet cell.
/// Returns None for cells that are empty or contain only whitespace.
#[must_use]
pub fn normalize_cell_text(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Text customers type into an index cell to mean "no index"
pub const INDEX_PLACEHOLDERS: [&str; 4] = ["n/a", "-", "none", "null"];

/// Whether `s` is a placeholder for an absent index, ignoring case
#[must_use]
pub fn is_index_placeholder(s: &str) -> bool {
    let s = s.trim();
    INDEX_PLACEHOLDERS
        .iter()
        .any(|placeholder| s.eq_ignore_ascii_case(placeholder))
}

/// Format a numeric cell the way a person reading the sheet sees it:
/// whole numbers lose their trailing `.0`.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Guarded by the range check
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
