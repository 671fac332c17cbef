use crate::catalog::DistMetadata;

pub const UNKNOWN_LICENSE: &str = "UNKNOWN";

/// Substrings that mark a `License` field as a pasted license body rather
/// than an identifier.
const BODY_KEYWORDS: [&str; 5] = [
    "copyright",
    "permission",
    "warranty",
    "redistribution",
    "liability",
];

/// Derive a short license label for a distribution.
///
/// Classifiers are the most reliable signal; the free-text `License` field
/// is used verbatim only when it looks like an identifier. Some projects
/// paste the entire license body into that field, and surfacing that in a
/// notices document buries the actual declared license, so a body-like
/// field is ignored in favor of the classifier-derived label.
///
/// Never returns an empty string; falls back to `"UNKNOWN"`.
pub fn infer_license(metadata: &DistMetadata) -> String {
    let guess = classifier_guess(metadata);
    let field = metadata.get("License").map(str::trim).unwrap_or("");

    if is_full_text_like(field) {
        return nonempty_or_unknown(guess);
    }
    if !field.is_empty() && !field.eq_ignore_ascii_case(UNKNOWN_LICENSE) {
        return field.to_string();
    }
    nonempty_or_unknown(guess)
}

/// Build a label from the `License ::` classifiers: deduplicate the raw
/// values keeping first-seen order, then strip the `OSI Approved ::`
/// marker and the redundant trailing "License", join with "; ".
/// Deduplication runs on the raw values, so two classifiers that only
/// simplify to the same token both survive.
fn classifier_guess(metadata: &DistMetadata) -> String {
    let mut raw: Vec<String> = Vec::new();
    for classifier in metadata.get_all("Classifier") {
        let Some(rest) = classifier.strip_prefix("License ::") else {
            continue;
        };
        let value = collapse_whitespace(rest.trim());
        if !value.is_empty() && !raw.contains(&value) {
            raw.push(value);
        }
    }

    let mut tokens: Vec<String> = Vec::new();
    for value in raw {
        let mut token = collapse_whitespace(&value.replace("OSI Approved ::", ""));
        if let Some(stripped) = token.strip_suffix("License") {
            token = stripped.trim_end().to_string();
        }
        if !token.is_empty() {
            tokens.push(token);
        }
    }

    tokens.join("; ")
}

/// A `License` field is full-text-like when it cannot be a short
/// identifier: multi-line, overlong, or carrying license-body phrasing.
fn is_full_text_like(field: &str) -> bool {
    if field.contains('\n') || field.contains('\r') {
        return true;
    }
    if field.len() > 120 {
        return true;
    }
    let lower = field.to_lowercase();
    BODY_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn nonempty_or_unknown(guess: String) -> String {
    if guess.is_empty() {
        UNKNOWN_LICENSE.to_string()
    } else {
        guess
    }
}
