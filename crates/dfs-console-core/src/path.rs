//! Absolute path helpers for the file browser.
//!
//! # Path Convention
//!
//! - Root: the single character `"/"`
//! - Everything else: `"/a/b"` with no trailing slash
//!
//! Paths are displayed exactly as held; the trash prefix is applied only when
//! building a listing request (see [`Namespace`](crate::model::Namespace)).

/// The root directory.
pub const ROOT: &str = "/";

/// Directory under which the server keeps a user's trashed entries.
pub const TRASH_DIR: &str = "/.Trash";

/// Append a single segment to an absolute directory path.
///
/// Root is special-cased so the result never starts with `//`.
pub fn concat(base: &str, segment: &str) -> String {
    if base == ROOT {
        format!("{}{}", base, segment)
    } else {
        format!("{}/{}", base, segment)
    }
}

/// Check whether `path` is the root directory.
#[inline]
pub fn is_root(path: &str) -> bool {
    path == ROOT
}

/// Non-empty segments of a path, in order.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// A clickable breadcrumb.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Crumb {
    /// Segment name shown to the user.
    pub label: String,
    /// Absolute path navigated to when the crumb is clicked.
    pub target: String,
}

/// Breadcrumb trail for `path`, one crumb per prefix.
///
/// Root produces an empty trail; the UI renders its own "Home" crumb.
pub fn breadcrumbs(path: &str) -> Vec<Crumb> {
    let segs = segments(path);
    (0..segs.len())
        .map(|i| Crumb {
            label: segs[i].to_string(),
            target: prefix_path(&segs, i),
        })
        .collect()
}

/// Path targeted by clicking crumb `index` of `path`.
pub fn crumb_target(path: &str, index: usize) -> Option<String> {
    let segs = segments(path);
    (index < segs.len()).then(|| prefix_path(&segs, index))
}

fn prefix_path(segs: &[&str], index: usize) -> String {
    format!("/{}", segs[..=index].join("/"))
}

/// Parent directory of an absolute path (root is its own parent).
pub fn parent(path: &str) -> String {
    let segs = segments(path);
    match segs.len() {
        0 | 1 => ROOT.to_string(),
        n => format!("/{}", segs[..n - 1].join("/")),
    }
}

/// Normalize user input into the browser's absolute form.
///
/// Collapses duplicate slashes, drops a trailing slash and adds the leading
/// one, so `"a//b/"` becomes `"/a/b"` and `""` becomes `"/"`.
pub fn normalize(path: &str) -> String {
    let segs = segments(path);
    if segs.is_empty() {
        ROOT.to_string()
    } else {
        format!("/{}", segs.join("/"))
    }
}
