//! Degree cap computation.

/// Maximum neighbor count for a network of `mix_count` mixes.
///
/// `floor(factor * log2(N))`, never below 1 so that every mix can hold at
/// least one edge.
pub fn degree_cap(mix_count: usize, factor: f64) -> usize {
    if mix_count <= 1 {
        return 1;
    }
    let cap = (factor * (mix_count as f64).log2()).floor();
    if cap < 1.0 {
        1
    } else {
        cap as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_factor() {
        assert_eq!(degree_cap(2, 2.0), 2);
        assert_eq!(degree_cap(3, 2.0), 3);
        assert_eq!(degree_cap(4, 2.0), 4);
        assert_eq!(degree_cap(16, 2.0), 8);
        assert_eq!(degree_cap(100, 2.0), 13);
        assert_eq!(degree_cap(1024, 2.0), 20);
    }

    #[test]
    fn test_small_networks_keep_one_slot() {
        assert_eq!(degree_cap(0, 2.0), 1);
        assert_eq!(degree_cap(1, 2.0), 1);
        assert_eq!(degree_cap(2, 0.5), 1);
        assert_eq!(degree_cap(3, 0.1), 1);
    }
}
