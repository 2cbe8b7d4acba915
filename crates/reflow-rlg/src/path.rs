//! Structural-path helpers.
//!
//! Paths are XPath-shaped (`/html/body/div[2]/p[1]`), stable per element across
//! widths, and the only identity the graph trusts. All tie-breaks over paths
//! are deterministic: ancestry, then length, then lexicographic order.

/// True when `ancestor` is a strict structural ancestor of `descendant`.
pub fn is_ancestor(ancestor: &str, descendant: &str) -> bool {
    if descendant.len() <= ancestor.len() || !descendant.starts_with(ancestor) {
        return false;
    }
    descendant.as_bytes()[ancestor.len()] == b'/'
}

/// True when the paths are identical or one is an ancestor of the other.
pub fn is_related(a: &str, b: &str) -> bool {
    a == b || is_ancestor(a, b) || is_ancestor(b, a)
}

/// Length in bytes of the longest common segment-aligned prefix.
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    let mut last_boundary = 0;
    let bytes_a = a.as_bytes();
    let bytes_b = b.as_bytes();
    let limit = bytes_a.len().min(bytes_b.len());
    let mut i = 0;
    while i < limit && bytes_a[i] == bytes_b[i] {
        if bytes_a[i] == b'/' {
            last_boundary = i;
        }
        i += 1;
    }
    if i == bytes_a.len() && (i == bytes_b.len() || bytes_b[i] == b'/') {
        return i;
    }
    if i == bytes_b.len() && bytes_a[i] == b'/' {
        return i;
    }
    last_boundary
}

/// Deterministic "who is the ancestor" tie-break for rectangles with identical
/// bounds: a prefix path wins; otherwise the shorter path, then the
/// lexicographically smaller one.
pub fn ancestor_by_tie_break<'a>(a: &'a str, b: &'a str) -> &'a str {
    if is_ancestor(a, b) {
        return a;
    }
    if is_ancestor(b, a) {
        return b;
    }
    match a.len().cmp(&b.len()) {
        std::cmp::Ordering::Less => a,
        std::cmp::Ordering::Greater => b,
        std::cmp::Ordering::Equal => {
            if a <= b {
                a
            } else {
                b
            }
        }
    }
}
