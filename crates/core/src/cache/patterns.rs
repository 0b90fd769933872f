//! Glob matching for cache keys.
//!
//! Supports `*` as a wildcard matching any run of characters (including the
//! empty run). This is the only pattern syntax the invalidation fabric emits.

/// Checks whether `key` matches a glob `pattern`.
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == key;
    }

    let segments: Vec<&str> = pattern.split('*').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        // Pattern was wildcards only.
        return true;
    }

    let anchored_start = !pattern.starts_with('*');
    let anchored_end = !pattern.ends_with('*');

    let mut rest = key;
    for (i, segment) in segments.iter().enumerate() {
        if i == 0 && anchored_start {
            match rest.strip_prefix(segment) {
                Some(r) => rest = r,
                None => return false,
            }
            continue;
        }
        match rest.find(segment) {
            Some(pos) => rest = &rest[pos + segment.len()..],
            None => return false,
        }
    }

    // With an anchored tail the final segment must have consumed to the end.
    if anchored_end {
        let last = segments.last().expect("segments is non-empty");
        if !rest.is_empty() {
            // The last find above may have matched too early; accept only if
            // the key ends with the final literal segment and everything
            // before it was already covered.
            return key.ends_with(last) && pattern_matches(
                &pattern[..pattern.len() - last.len()],
                &key[..key.len() - last.len()],
            );
        }
    }
    true
}
