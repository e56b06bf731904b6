//! Price and area formatting for listing cards.
//!
//! Prices are whole Pakistani rupees. Large amounts use the local
//! crore (1,00,00,000) and lac (1,00,000) units.

pub const CRORE: i64 = 10_000_000;
pub const LAC: i64 = 100_000;

/// Format a PKR amount, e.g. `18_500_000` as `Rs. 1 Crore 85 Lac`
pub fn format_price(price: i64) -> String {
    if price >= CRORE {
        let crore = price / CRORE;
        let lac = (price % CRORE) / LAC;
        if lac > 0 {
            format!("Rs. {} Crore {} Lac", crore, lac)
        } else {
            format!("Rs. {} Crore", crore)
        }
    } else if price >= LAC {
        format!("Rs. {} Lac", price / LAC)
    } else {
        format!("Rs. {}", group_thousands(price))
    }
}

/// Insert thousands separators: `85000` becomes `85,000`
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_area(area: f64, unit: &str) -> String {
    let unit = match unit {
        "sqft" => "sq.ft",
        other => other,
    };
    if unit.is_empty() {
        area.to_string()
    } else {
        format!("{} {}", area, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_crore_and_lac() {
        assert_eq!(format_price(18_500_000), "Rs. 1 Crore 85 Lac");
        assert_eq!(format_price(45_000_000), "Rs. 4 Crore 50 Lac");
        assert_eq!(format_price(20_000_000), "Rs. 2 Crore");
        assert_eq!(format_price(CRORE), "Rs. 1 Crore");
    }

    #[test]
    fn test_format_price_lac() {
        assert_eq!(format_price(8_500_000), "Rs. 85 Lac");
        assert_eq!(format_price(LAC), "Rs. 1 Lac");
        assert_eq!(format_price(150_000), "Rs. 1 Lac");
    }

    #[test]
    fn test_format_price_small_amounts() {
        assert_eq!(format_price(85_000), "Rs. 85,000");
        assert_eq!(format_price(999), "Rs. 999");
        assert_eq!(format_price(0), "Rs. 0");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(100), "100");
        assert_eq!(group_thousands(-45_000), "-45,000");
    }

    #[test]
    fn test_format_area() {
        assert_eq!(format_area(5.0, "marla"), "5 marla");
        assert_eq!(format_area(1.5, "kanal"), "1.5 kanal");
        assert_eq!(format_area(1200.0, "sqft"), "1200 sq.ft");
        assert_eq!(format_area(10.0, ""), "10");
    }
}
