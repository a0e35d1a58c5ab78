use kindred::models::Sex;

/// Parse a sex argument; accepts the first letter as a shorthand.
pub fn parse_sex(value: &str) -> Result<Sex, String> {
    match value.to_lowercase().as_str() {
        "male" | "m" => Ok(Sex::Male),
        "female" | "f" => Ok(Sex::Female),
        "other" | "o" => Ok(Sex::Other),
        "unknown" | "u" => Ok(Sex::Unknown),
        _ => Err(format!(
            "Invalid sex: {} (expected male, female, other or unknown)",
            value
        )),
    }
}
