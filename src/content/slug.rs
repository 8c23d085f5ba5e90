//! Page slug helpers.
//!
//! A slug is an absolute path (`/`, `/about`, `/about/team`). The editor API
//! addresses pages with a URL param form of the slug where the homepage is
//! spelled `home` and the leading slash is dropped.

/// Slug of the homepage.
pub const ROOT: &str = "/";

/// URL param used for the homepage.
pub const HOME_PARAM: &str = "home";

/// Normalize a requested path into a slug: empty becomes `/`, a missing
/// leading slash is prepended and one trailing slash is dropped.
pub fn normalize_request_path(path: Option<&str>) -> String {
    let slug = match path {
        None | Some("") => return ROOT.to_string(),
        Some(p) if p.starts_with('/') => p.to_string(),
        Some(p) => format!("/{}", p),
    };
    match slug.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed.to_string(),
        _ => slug,
    }
}

/// Parent of a slug. The root has no parent; a single segment hangs off `/`.
pub fn parent_slug(slug: &str) -> Option<String> {
    if slug == ROOT {
        return None;
    }

    let parts: Vec<&str> = slug.split('/').filter(|s| !s.is_empty()).collect();
    if parts.len() <= 1 {
        return Some(ROOT.to_string());
    }

    Some(format!("/{}", parts[..parts.len() - 1].join("/")))
}

/// `/` → `home`, `/about/team` → `about/team`.
pub fn slug_to_param(slug: &str) -> String {
    if slug == ROOT {
        return HOME_PARAM.to_string();
    }
    slug.strip_prefix('/').unwrap_or(slug).to_string()
}

/// `home` → `/`, `about/team` → `/about/team`.
pub fn param_to_slug(param: &str) -> String {
    if param == HOME_PARAM {
        return ROOT.to_string();
    }
    format!("/{}", param.trim_start_matches('/'))
}
