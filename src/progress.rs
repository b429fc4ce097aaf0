/// Fraction of a download completed, clamped to 1.0.
///
/// The server may omit Content-Length; with no total to measure against
/// the fraction stays at 0 and the bar only fills on completion.
pub fn progress_fraction(downloaded: u64, total: Option<u64>) -> f32 {
    match total {
        Some(total) if total > 0 => (downloaded as f32 / total as f32).min(1.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_of_known_total() {
        assert_eq!(progress_fraction(50, Some(200)), 0.25);
        assert_eq!(progress_fraction(200, Some(200)), 1.0);
    }

    #[test]
    fn fraction_is_clamped() {
        // servers occasionally understate Content-Length
        assert_eq!(progress_fraction(300, Some(200)), 1.0);
    }

    #[test]
    fn unknown_or_zero_total_reads_as_zero() {
        assert_eq!(progress_fraction(50, None), 0.0);
        assert_eq!(progress_fraction(50, Some(0)), 0.0);
    }
}
