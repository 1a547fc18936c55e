//! Bracketed template placeholders such as `[Name]`

use std::collections::HashMap;

use crate::models::Contact;

/// Unique placeholder names in `subject` then `body`, first-seen order
///
/// A placeholder is the trimmed text between `[` and the next `]` on the
/// same line. Empty placeholders are ignored.
pub fn extract_placeholders(subject: &str, body: &str) -> Vec<String> {
    let text = format!("{} {}", subject, body);
    let mut found: Vec<String> = Vec::new();
    let mut rest = text.as_str();

    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        match after.find([']', '\n']) {
            Some(end) if after[end..].starts_with(']') => {
                let name = after[..end].trim();
                if !name.is_empty() && !found.iter().any(|p| p == name) {
                    found.push(name.to_string());
                }
                rest = &after[end + 1..];
            }
            _ => rest = after,
        }
    }

    found
}

/// Pre-filled values for `placeholders` from the recipient and subject
///
/// The recipient contact is the first contact whose email occurs in `to`.
pub fn suggest_placeholder_values(
    placeholders: &[String],
    to: &str,
    subject: &str,
    contacts: &[Contact],
) -> HashMap<String, String> {
    let recipient = contacts.iter().find(|c| !c.email.is_empty() && to.contains(&c.email));
    let mut values = HashMap::new();

    for placeholder in placeholders {
        let value = match (placeholder.to_lowercase().as_str(), recipient) {
            ("name" | "contact name" | "recipient name", Some(contact)) => {
                contact.first_name().to_string()
            }
            ("full name" | "full_name", Some(contact)) => contact.name.clone(),
            ("subject", _) if !subject.is_empty() => subject.to_string(),
            _ => continue,
        };
        values.insert(placeholder.clone(), value);
    }

    values
}

/// Replace every `[key]` in `subject` and `body` with its value
pub fn apply_placeholders(
    subject: &str,
    body: &str,
    values: &HashMap<String, String>,
) -> (String, String) {
    let mut subject = subject.to_string();
    let mut body = body.to_string();
    for (key, value) in values {
        let pattern = format!("[{}]", key);
        subject = subject.replace(&pattern, value);
        body = body.replace(&pattern, value);
    }
    (subject, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_unique_in_order() {
        let found = extract_placeholders(
            "Meeting with [Name]",
            "Hi [Name],\nSee you on [ Date ] about [subject]. [] [broken\nline]",
        );
        assert_eq!(found, vec!["Name", "Date", "subject"]);
    }

    #[test]
    fn test_extract_none() {
        assert!(extract_placeholders("Hello", "No placeholders here").is_empty());
    }

    #[test]
    fn test_suggest_values_from_recipient() {
        let contacts = vec![Contact::new("c1", "acc", "Alice Smith", "alice@example.com")];
        let placeholders: Vec<String> = ["Name", "Full Name", "Subject", "Date"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let values =
            suggest_placeholder_values(&placeholders, "alice@example.com", "Kickoff", &contacts);
        assert_eq!(values.get("Name").map(String::as_str), Some("Alice"));
        assert_eq!(values.get("Full Name").map(String::as_str), Some("Alice Smith"));
        assert_eq!(values.get("Subject").map(String::as_str), Some("Kickoff"));
        assert!(!values.contains_key("Date"));

        let unknown = suggest_placeholder_values(&placeholders, "zed@example.com", "", &contacts);
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_apply_replaces_every_occurrence() {
        let mut values = HashMap::new();
        values.insert("Name".to_string(), "Bob".to_string());
        let (subject, body) = apply_placeholders("Hi [Name]", "[Name], [Name]! [Other]", &values);
        assert_eq!(subject, "Hi Bob");
        assert_eq!(body, "Bob, Bob! [Other]");
    }
}
