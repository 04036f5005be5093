use bigdecimal::BigDecimal;

/// Normalize a monetary value to 2 decimal places. Menu prices and order
/// totals are stored and compared at this scale.
pub fn normalize_scale(value: &BigDecimal) -> BigDecimal {
    value.with_scale(2)
}

pub fn is_negative(value: &BigDecimal) -> bool {
    value < &BigDecimal::from(0)
}

/// Total for one order line at its snapshot price.
pub fn line_total(price: &BigDecimal, quantity: i32) -> BigDecimal {
    normalize_scale(&(price * BigDecimal::from(quantity)))
}

/// Order total: sum of price x quantity over the snapshot lines. Totals are
/// always computed server-side from these lines; client-supplied totals are
/// never trusted.
pub fn order_total<'a>(lines: impl IntoIterator<Item = (&'a BigDecimal, i32)>) -> BigDecimal {
    let sum = lines
        .into_iter()
        .fold(BigDecimal::from(0), |acc, (price, quantity)| {
            acc + price * BigDecimal::from(quantity)
        });
    normalize_scale(&sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::parse_bytes(s.as_bytes(), 10).unwrap()
    }

    #[test]
    fn normalizes_to_two_places() {
        assert_eq!(normalize_scale(&dec("12.3456")).to_string(), "12.34");
        assert_eq!(normalize_scale(&dec("5")).to_string(), "5.00");
    }

    #[test]
    fn line_total_multiplies_snapshot_price() {
        assert_eq!(line_total(&dec("2.50"), 3).to_string(), "7.50");
    }

    #[test]
    fn order_total_sums_lines() {
        let burger = dec("9.99");
        let fries = dec("3.25");
        let total = order_total([(&burger, 2), (&fries, 1)]);
        assert_eq!(total.to_string(), "23.23");
    }

    #[test]
    fn empty_order_totals_zero() {
        let lines: [(&BigDecimal, i32); 0] = [];
        assert_eq!(order_total(lines).to_string(), "0.00");
    }

    #[test]
    fn detects_negative_prices() {
        assert!(is_negative(&dec("-0.01")));
        assert!(!is_negative(&dec("0")));
        assert!(!is_negative(&dec("4.20")));
    }
}
