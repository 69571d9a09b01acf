fn with_handle(base: &str, resource: &str, handle: &str) -> String {
    format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        resource,
        urlencoding::encode(handle.trim())
    )
}

/// Submission calendar, solved counts and badges.
pub fn profile_url(base: &str, handle: &str) -> String {
    with_handle(base, "profile", handle)
}

/// Contest ranking and rating history.
pub fn contest_url(base: &str, handle: &str) -> String {
    with_handle(base, "contest", handle)
}
