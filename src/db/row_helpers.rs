/// Filter empty strings to None — used when DB stores '' instead of NULL
pub fn none_if_empty(opt: Option<String>) -> Option<String> {
    opt.filter(|s| !s.is_empty())
}

/// Resolve an explicit slug or derive one from the name.
pub fn slug_or_derive(slug: &Option<String>, name: &str) -> String {
    match slug {
        Some(s) if !s.is_empty() => s.clone(),
        _ => crate::utils::slugify(name),
    }
}
