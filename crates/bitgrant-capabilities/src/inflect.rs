//! Resource name inflection used to derive family names.
//!
//! Only the handful of English rules needed to turn resource names such as
//! `posts`, `CopyEdits` or `categories` into `post`, `copy_edit` and
//! `category` are covered.

/// Convert `CamelCase`, `kebab-case` or spaced words into `snake_case`.
pub(crate) fn underscore(word: &str) -> String {
    let mut out = String::with_capacity(word.len().saturating_add(4));
    let mut prev_lower = false;

    for ch in word.trim().chars() {
        if ch == '-' || ch == ' ' || ch == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
        } else if ch.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        }
    }

    out.trim_end_matches('_').to_owned()
}

/// Singularize the last segment of a `snake_case` name.
pub(crate) fn singularize(word: &str) -> String {
    let (head, last) = match word.rfind('_') {
        Some(pos) => word.split_at(pos.saturating_add(1)),
        None => ("", word),
    };

    let singular = if let Some(stem) = last.strip_suffix("ies").filter(|s| !s.is_empty()) {
        format!("{stem}y")
    } else if ["sses", "ches", "shes", "xes", "zzes"]
        .iter()
        .any(|suffix| last.ends_with(suffix))
    {
        last.strip_suffix("es").unwrap_or(last).to_owned()
    } else if ["ss", "us", "is"].iter().any(|suffix| last.ends_with(suffix)) {
        last.to_owned()
    } else if let Some(stem) = last.strip_suffix('s').filter(|s| !s.is_empty()) {
        stem.to_owned()
    } else {
        last.to_owned()
    };

    format!("{head}{singular}")
}

/// Convert `snake_case` into `CamelCase`.
pub(crate) fn camelize(word: &str) -> String {
    word.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Normalize a resource name: underscored and singular.
pub(crate) fn resource_name(raw: &str) -> String {
    let underscored = underscore(raw);
    if underscored.is_empty() {
        underscored
    } else {
        singularize(&underscored)
    }
}
