use crate::rng::GenRng;

/// Splits `total` into `parts` integers, each within `[min_each, max_each]`,
/// summing back to exactly `total`.
///
/// Resolves the partitioning question left open by the budget model:
/// sequential uniform draws with remainder clamp. Each part but the last is
/// drawn uniformly from whatever range still leaves enough room for the
/// rest of the parts to land in bounds; the last part takes whatever
/// remains, which the bookkeeping above guarantees is itself in bounds.
pub fn constrained_sum(rng: &mut GenRng, total: i64, parts: usize, min_each: i64, max_each: i64) -> Vec<i64> {
    assert!(parts > 0, "constrained_sum needs at least one part");
    assert!(min_each <= max_each, "min_each must not exceed max_each");
    assert!(
        total >= min_each * parts as i64 && total <= max_each * parts as i64,
        "total {total} is not representable by {parts} parts in [{min_each}, {max_each}]"
    );

    let mut out = Vec::with_capacity(parts);
    let mut remaining_total = total;
    for i in 0..parts {
        let remaining_parts = (parts - i) as i64;
        if remaining_parts == 1 {
            out.push(remaining_total);
            break;
        }
        let lower = (remaining_total - max_each * (remaining_parts - 1)).max(min_each);
        let upper = (remaining_total - min_each * (remaining_parts - 1)).min(max_each);
        let draw = rng.int_range(lower, upper);
        out.push(draw);
        remaining_total -= draw;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_back_to_total_and_stays_in_bounds() {
        let mut rng = GenRng::from_seed(4);
        for _ in 0..50 {
            let parts = constrained_sum(&mut rng, 100, 4, 5, 50);
            assert_eq!(parts.iter().sum::<i64>(), 100);
            assert!(parts.iter().all(|&p| (5..=50).contains(&p)));
        }
    }

    #[test]
    fn single_part_returns_the_whole_total() {
        let mut rng = GenRng::from_seed(1);
        let parts = constrained_sum(&mut rng, 37, 1, 0, 100);
        assert_eq!(parts, vec![37]);
    }
}
