//! Query-string helpers shared by list operations.

/// Parse a boolean query flag.
///
/// `1/true/yes/y/on` and `0/false/no/n/off` are accepted in any case;
/// anything else, including an absent flag, yields `default`.
pub fn parse_bool_flag(raw: Option<&str>, default: bool) -> bool {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => true,
        "0" | "false" | "no" | "n" | "off" => false,
        _ => default,
    }
}
