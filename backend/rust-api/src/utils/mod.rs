/// `round(100 * part / total)` with halves rounded up, in integer arithmetic.
///
/// Callers guarantee `total > 0` and `part <= total`.
pub fn percent(part: usize, total: usize) -> u8 {
    debug_assert!(total > 0 && part <= total);
    ((200 * part + total) / (2 * total)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(0, 2), 0);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(2, 2), 100);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
    }
}
