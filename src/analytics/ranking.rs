/// The `k` highest-scoring entries, best first. The sort is stable, so
/// entries with equal scores keep the order they arrived in.
pub fn top_k<K, S, I>(entries: I, k: usize) -> Vec<(K, S)>
where
    I: IntoIterator<Item = (K, S)>,
    S: Ord,
{
    let mut ranked: Vec<(K, S)> = entries.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ties_keep_first_seen_order() {
        let entries = vec![("b", 2), ("a", 5), ("c", 2), ("d", 5), ("e", 1)];
        assert_eq!(top_k(entries, 4), vec![("a", 5), ("d", 5), ("b", 2), ("c", 2)]);
    }

    #[test]
    fn test_k_larger_than_input() {
        assert_eq!(top_k(vec![("x", 1)], 10), vec![("x", 1)]);
        assert!(top_k(Vec::<(&str, u64)>::new(), 10).is_empty());
    }
}
