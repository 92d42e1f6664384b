//! Cleanup of server validation messages before they are shown to a user.

/// Strips escaped and stray quotes and list brackets, trims, and capitalises
/// the first letter.
pub fn clean_validation_message(raw: &str) -> String {
    let stripped = raw
        .replace("\\\"", "")
        .replace('"', "")
        .replace(['[', ']'], "");
    capitalise_first(stripped.trim())
}

fn capitalise_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
