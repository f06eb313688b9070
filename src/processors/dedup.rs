use std::collections::HashSet;
use std::hash::Hash;

/// Keep the first row seen for each key, preserving input order.
///
/// Callers order `rows` so that the row they want to survive comes first;
/// that ordering is the tie-break policy.
pub fn retain_first_by_key<T, K, F>(rows: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter().filter(|row| seen.insert(key(row))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_row_wins() {
        let rows = vec![("a", 1), ("b", 2), ("a", 3), ("c", 4), ("b", 5)];
        let kept = retain_first_by_key(rows, |(key, _)| *key);
        assert_eq!(kept, vec![("a", 1), ("b", 2), ("c", 4)]);
    }

    #[test]
    fn test_empty_input() {
        let kept = retain_first_by_key(Vec::<u32>::new(), |row| *row);
        assert!(kept.is_empty());
    }
}
