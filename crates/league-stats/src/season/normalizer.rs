//! Player identity across rounds: nicknames in «guillemets» are decoration.

use std::sync::LazyLock;

use regex::Regex;

static NICKNAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"«[^»]+»\s*").unwrap());

/// Stable identity for a raw player name; `"Unknown"` when nothing is left.
pub fn normalize_player(raw: &str) -> String {
    let stripped = NICKNAME.replace_all(raw, "");
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        "Unknown".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nickname_removed() {
        assert_eq!(normalize_player("Ann «The Rook» Lee"), "Ann Lee");
        assert_eq!(normalize_player("Bo «Ghost» K."), "Bo K.");
        assert_eq!(normalize_player("  Bo K. "), "Bo K.");
    }

    #[test]
    fn test_trailing_nickname() {
        assert_eq!(normalize_player("Cy «the Wall»"), "Cy");
    }

    #[test]
    fn test_empty_is_unknown() {
        assert_eq!(normalize_player(""), "Unknown");
        assert_eq!(normalize_player("«Mystery»"), "Unknown");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_player("Ann «The Rook» Lee");
        assert_eq!(normalize_player(&once), once);
    }
}
