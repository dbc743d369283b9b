//! String-level path rewriting used when embedding CodeLite paths in a
//! Makefile.
//!
//! None of these functions touch the filesystem.  [`adjust_path`] is a
//! lossy flattening kept for output compatibility with scripts generated by
//! earlier versions of the tool; [`resolve_parent_segments`] is the lexically
//! correct alternative selected by [`PathMode::Resolve`].

/// How parent-directory segments are treated when embedding a path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PathMode {
    /// Delete every `../` token ([`adjust_path`]).
    #[default]
    Flatten,
    /// Remove `segment/..` pairs ([`resolve_parent_segments`]).
    Resolve,
}

impl PathMode {
    pub fn apply(self, path: &str) -> String {
        match self {
            Self::Flatten => adjust_path(path),
            Self::Resolve => resolve_parent_segments(path),
        }
    }
}

/// Rewrite `..\` to `../`, then delete every `../` token in place, rescanning
/// until none is left.
///
/// The preceding segment is not removed: `a/b/../c` becomes `a/b/c`.
pub fn adjust_path(path: &str) -> String {
    let mut result = path.replace("..\\", "../");
    while let Some(pos) = result.find("../") {
        result.replace_range(pos..pos + 3, "");
    }
    result
}

/// Turn a path into a single Make-safe token: `.` → `_`, then `/` and `\` → `.`.
///
/// Distinct paths can collide, e.g. `a_b` and `a.b` both give `a_b`.
pub fn mangle_path(path: &str) -> String {
    path.replace('.', "_").replace('/', ".").replace('\\', ".")
}

/// Object file name for a `.cpp` source: `src/main.cpp` → `src.main.o`.
pub fn object_name(code_file: &str, mode: PathMode) -> String {
    let mangled = mangle_path(&mode.apply(&code_file.replace(".cpp", ".o")));
    match mangled.strip_suffix("_o") {
        Some(stem) => format!("{stem}.o"),
        None => mangled,
    }
}

/// Everything before the last `/` or `\`, or `""` when there is none.
pub fn directory_name(path: &str) -> &str {
    path.rfind(['/', '\\']).map_or("", |pos| &path[..pos])
}

/// Lexically collapse `segment/..` pairs after normalising `\` to `/`.
///
/// Leading `..` segments that have nothing to cancel are kept, as are empty
/// and `.` segments.  Space-separated words are resolved independently.
pub fn resolve_parent_segments(path: &str) -> String {
    path.split(' ')
        .map(resolve_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn resolve_word(word: &str) -> String {
    let normalized = word.replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();

    for segment in normalized.split('/') {
        if segment == ".." {
            match segments.last() {
                Some(&last) if is_removable(last) => {
                    segments.pop();
                }
                _ => segments.push(segment),
            }
        } else {
            segments.push(segment);
        }
    }

    segments.join("/")
}

/// A segment a following `..` may cancel: not empty, `.`, `..` or a drive.
fn is_removable(segment: &str) -> bool {
    !matches!(segment, "" | "." | "..") && !segment.ends_with(':')
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════════
