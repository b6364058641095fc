use std::fmt::Display;

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Build an IRI-style identifier (`/<resource>/<id>`) from a bare id.
///
/// Ids that already look like an IRI for the same resource are returned as is,
/// so callers may pass either form. Nothing else is checked: an IRI of another
/// resource gets prefixed like a bare id (`iri("users", "/heists/3")` is
/// `/users/heists/3`). Use [`try_iri`] on ids that come from outside.
pub fn iri(resource: &str, id: impl Display) -> String {
    let id = id.to_string();
    let prefix = format!("/{resource}/");
    if id.starts_with(&prefix) {
        return id;
    }
    format!("{prefix}{}", id.trim_start_matches('/'))
}

/// Like [`iri`], but `None` when `id` is an IRI of another resource.
pub fn try_iri(resource: &str, id: impl Display) -> Option<String> {
    let id = id.to_string();
    if id.starts_with('/') && !id.starts_with(&format!("/{resource}/")) {
        return None;
    }
    Some(iri(resource, id))
}

/// Strip the resource prefix of an IRI and return the bare id.
///
/// `"/heists/42"` -> `"42"`. A value without any `/` is returned unchanged.
pub fn get_uri_id(iri: &str) -> &str {
    let trimmed = iri.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((_, id)) => id,
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iri_prefixes_bare_ids() {
        assert_eq!(iri("users", 7), "/users/7");
        assert_eq!(iri("crew_members", "12"), "/crew_members/12");
    }

    #[test]
    fn iri_keeps_existing_iri() {
        assert_eq!(iri("heists", "/heists/3"), "/heists/3");
    }

    #[test]
    fn try_iri_rejects_foreign_iris() {
        assert_eq!(try_iri("users", "/heists/3"), None);
        assert_eq!(try_iri("users", "/"), None);
        assert_eq!(try_iri("users", "/users/3").as_deref(), Some("/users/3"));
        assert_eq!(try_iri("users", 3).as_deref(), Some("/users/3"));
        assert_eq!(iri("users", "/heists/3"), "/users/heists/3");
    }

    #[test]
    fn get_uri_id_strips_prefix() {
        assert_eq!(get_uri_id("/establishments/5"), "5");
        assert_eq!(get_uri_id("/establishments/5/"), "5");
        assert_eq!(get_uri_id("5"), "5");
    }
}
