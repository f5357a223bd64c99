/// Display name used for province codes outside the fixed table.
pub const UNKNOWN_PROVINCE_NAME: &str = "Unknown";

/// Administrative province codes and their display names.
pub const PROVINCES: [(&str, &str); 7] = [
    ("NP01", "Koshi"),
    ("NP02", "Madhesh"),
    ("NP03", "Bagmati"),
    ("NP04", "Gandaki"),
    ("NP05", "Lumbini"),
    ("NP06", "Karnali"),
    ("NP07", "Sudurpashchim"),
];

pub fn province_name(code: &str) -> &'static str {
    PROVINCES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_PROVINCE_NAME)
}

/// Reverse lookup from a display name to every code carrying it, in table order.
pub fn province_codes_for_name(name: &str) -> Vec<&'static str> {
    PROVINCES
        .iter()
        .filter(|(_, n)| *n == name)
        .map(|(code, _)| *code)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve_to_names() {
        assert_eq!(province_name("NP03"), "Bagmati");
        assert_eq!(province_name("NP07"), "Sudurpashchim");
    }

    #[test]
    fn unknown_code_falls_back() {
        assert_eq!(province_name("NP99"), UNKNOWN_PROVINCE_NAME);
        assert_eq!(province_name(""), UNKNOWN_PROVINCE_NAME);
    }

    #[test]
    fn reverse_lookup() {
        assert_eq!(province_codes_for_name("Gandaki"), vec!["NP04"]);
        assert!(province_codes_for_name("Unknown").is_empty());
        assert!(province_codes_for_name("gandaki").is_empty());
    }
}
