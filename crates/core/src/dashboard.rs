//! Dashboard arithmetic.

/// Share of finished tickets resolved on time, as a whole percentage.
/// With nothing finished yet the SLA is considered fully met.
pub fn sla_compliance_percent(finished: i64, on_time: i64) -> f64 {
    if finished <= 0 {
        return 100.0;
    }
    let ratio = on_time.clamp(0, finished) as f64 / finished as f64;
    (ratio * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_finished_tickets_is_full_compliance() {
        assert_eq!(sla_compliance_percent(0, 0), 100.0);
    }

    #[test]
    fn test_compliance_rounds_to_one_decimal() {
        assert_eq!(sla_compliance_percent(3, 2), 66.7);
        assert_eq!(sla_compliance_percent(4, 4), 100.0);
        assert_eq!(sla_compliance_percent(5, 0), 0.0);
    }
}
