//! Root-relative path arithmetic on `/`-separated path strings

/// Strip `root` from `path`.
///
/// Paths outside the root are taken as already relative to it; a leading
/// `./` or `/` is dropped either way.
pub fn relative_to_root<'a>(root: &str, path: &'a str) -> &'a str {
    let root = normalize_root(root);
    let rest = if root.is_empty() {
        path
    } else if path == root {
        ""
    } else {
        path.strip_prefix(root)
            .and_then(|rest| rest.strip_prefix('/').or(if root == "/" { Some(rest) } else { None }))
            .unwrap_or(path)
    };
    trim_leading(rest)
}

fn normalize_root(root: &str) -> &str {
    if root == "." || root == "./" {
        return "";
    }
    let trimmed = root.trim_end_matches('/');
    if trimmed.is_empty() && root.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}

fn trim_leading(mut path: &str) -> &str {
    loop {
        if let Some(rest) = path.strip_prefix("./") {
            path = rest;
        } else if let Some(rest) = path.strip_prefix('/') {
            path = rest;
        } else {
            return path;
        }
    }
}

/// Separator count of a relative path.
pub fn depth_of(relative: &str) -> usize {
    relative.matches('/').count()
}

/// Non-empty segments of a relative path.
pub fn segments(relative: &str) -> impl Iterator<Item = &str> {
    relative.split('/').filter(|s| !s.is_empty())
}

/// Final segment of a relative path.
pub fn file_name(relative: &str) -> &str {
    relative.rsplit('/').next().unwrap_or(relative)
}

/// Proper ancestor directories, shallowest first: `a/b/c` yields `a`, `a/b`.
pub fn ancestors(relative: &str) -> impl Iterator<Item = &str> {
    relative
        .match_indices('/')
        .map(move |(i, _)| &relative[..i])
        .filter(|dir| !dir.is_empty())
}
