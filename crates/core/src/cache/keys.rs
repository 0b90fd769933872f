//! Cache key builders.
//!
//! Every key is scoped by the owning user's email, so cross-user interference
//! is impossible by construction. Keys whose shape embeds query parameters
//! (transaction lists, summaries, charge status filters) are "tracked": each
//! backend records them in a per-user tracking set so they can be purged by
//! glob pattern without scanning the whole keyspace.

/// Cache key for a user's profile document.
pub fn profile_key(owner: &str) -> String {
    format!("user-profile:{}", owner)
}

/// Cache key for a user's jar list.
pub fn jars_key(owner: &str) -> String {
    format!("jars:{}", owner)
}

/// Cache key for a user's goal list.
pub fn goals_key(owner: &str) -> String {
    format!("goals:{}", owner)
}

/// Cache key for a single goal.
pub fn goal_key(goal_id: &str) -> String {
    format!("goal:{}", goal_id)
}

/// Cache key for a user's charge list filtered by status.
pub fn charges_key(owner: &str, status: &str) -> String {
    format!("charges:{}:status-{}", owner, status)
}

/// Pattern matching every charge-status key of a user.
pub fn charges_pattern(owner: &str) -> String {
    format!("charges:{}:*", owner)
}

/// Cache key for one page of a user's transaction list.
///
/// Absent filters are encoded as `all` so the key is total over its inputs.
pub fn transactions_key(
    owner: &str,
    page: i64,
    limit: i64,
    type_filter: Option<&str>,
    month: Option<u32>,
    year: Option<i32>,
) -> String {
    format!(
        "transactions:{}:page-{}-limit-{}-type-{}-month-{}-year-{}",
        owner,
        page,
        limit,
        type_filter.unwrap_or("all"),
        month.map_or_else(|| "all".to_string(), |m| m.to_string()),
        year.map_or_else(|| "all".to_string(), |y| y.to_string()),
    )
}

/// Pattern matching every transaction-list key of a user.
pub fn transactions_pattern(owner: &str) -> String {
    format!("transactions:{}:*", owner)
}

/// Cache key for a user's monthly income/expense summary.
pub fn summary_key(owner: &str, month: u32, year: i32) -> String {
    format!("summary:{}:month-{}-year-{}", owner, month, year)
}

/// Pattern matching every summary key of a user.
pub fn summary_pattern(owner: &str) -> String {
    format!("summary:{}:*", owner)
}

/// Cache key for a user's generated insights.
pub fn insights_key(owner: &str) -> String {
    format!("insights:{}", owner)
}

/// Key of the set tracking a user's pattern-deletable cache keys.
pub fn tracking_key(owner: &str) -> String {
    format!("cachekeys:{}", owner)
}

const TRACKED_PREFIXES: [&str; 3] = ["transactions:", "summary:", "charges:"];

/// Whether a key belongs to a tracked class (parameterized keys that are
/// purged by pattern rather than individually).
pub fn is_tracked_key(key: &str) -> bool {
    TRACKED_PREFIXES.iter().any(|p| key.starts_with(p))
        && key.splitn(3, ':').count() == 3
}

/// Extracts the owning user from a tracked key, if it is one.
pub fn owner_of_key(key: &str) -> Option<&str> {
    if !is_tracked_key(key) {
        return None;
    }
    key.split(':').nth(1)
}

/// Extracts the owning user from a tracked-class pattern.
///
/// Returns `None` when the pattern does not target a tracked class or the
/// owner segment itself is wildcarded.
pub fn owner_of_pattern(pattern: &str) -> Option<&str> {
    if !TRACKED_PREFIXES.iter().any(|p| pattern.starts_with(p)) {
        return None;
    }
    let owner = pattern.split(':').nth(1)?;
    if owner.is_empty() || owner.contains('*') {
        return None;
    }
    Some(owner)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "john@x.com";

    #[test]
    fn simple_keys_embed_the_owner() {
        assert_eq!(profile_key(OWNER), "user-profile:john@x.com");
        assert_eq!(jars_key(OWNER), "jars:john@x.com");
        assert_eq!(goals_key(OWNER), "goals:john@x.com");
        assert_eq!(goal_key("g-1"), "goal:g-1");
        assert_eq!(insights_key(OWNER), "insights:john@x.com");
        assert_eq!(tracking_key(OWNER), "cachekeys:john@x.com");
    }

    #[test]
    fn transactions_key_is_total_over_filters() {
        assert_eq!(
            transactions_key(OWNER, 1, 10, None, None, None),
            "transactions:john@x.com:page-1-limit-10-type-all-month-all-year-all"
        );
        assert_eq!(
            transactions_key(OWNER, 2, 25, Some("Expense"), Some(7), Some(2026)),
            "transactions:john@x.com:page-2-limit-25-type-Expense-month-7-year-2026"
        );
    }

    #[test]
    fn charge_and_summary_keys_match_their_patterns() {
        use super::super::pattern_matches;

        let key = charges_key(OWNER, "Due");
        assert_eq!(key, "charges:john@x.com:status-Due");
        assert!(pattern_matches(&charges_pattern(OWNER), &key));

        let key = summary_key(OWNER, 7, 2026);
        assert_eq!(key, "summary:john@x.com:month-7-year-2026");
        assert!(pattern_matches(&summary_pattern(OWNER), &key));
    }

    #[test]
    fn tracked_classification() {
        assert!(is_tracked_key(&transactions_key(OWNER, 1, 10, None, None, None)));
        assert!(is_tracked_key(&summary_key(OWNER, 1, 2026)));
        assert!(is_tracked_key(&charges_key(OWNER, "Upcoming")));

        assert!(!is_tracked_key(&jars_key(OWNER)));
        assert!(!is_tracked_key(&profile_key(OWNER)));
        assert!(!is_tracked_key(&insights_key(OWNER)));
        assert!(!is_tracked_key(&tracking_key(OWNER)));
    }

    #[test]
    fn owner_extraction_from_keys_and_patterns() {
        assert_eq!(
            owner_of_key(&charges_key(OWNER, "Paid")),
            Some("john@x.com")
        );
        assert_eq!(owner_of_key(&jars_key(OWNER)), None);

        assert_eq!(
            owner_of_pattern(&transactions_pattern(OWNER)),
            Some("john@x.com")
        );
        assert_eq!(owner_of_pattern("transactions:*:*"), None);
        assert_eq!(owner_of_pattern("jars:john@x.com"), None);
    }
}
