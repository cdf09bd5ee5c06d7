/// Groups the digits of a non-negative integer string in triads.
fn group_thousands(digits: &str) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Форматирует число с разделителями тысяч (запятыми)
///
/// # Примеры
/// ```ignore
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: u64) -> String {
    group_thousands(&n.to_string())
}

/// Money with thousands separators and a fixed number of decimals,
/// currency symbol first: `£1,234`, `£10.00`, `£-27.50`.
pub fn format_money(value: f64, decimals: u8, currency: &str) -> String {
    let rendered = format!("{:.*}", decimals as usize, value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rendered.as_str(), None),
    };

    // "-0" is not printed for values that round to zero
    let negative = value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };

    match frac_part {
        Some(frac) => format!("{}{}{}.{}", currency, sign, group_thousands(int_part), frac),
        None => format!("{}{}{}", currency, sign, group_thousands(int_part)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(1234567890), "1,234,567,890");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(20.0, 0, "£"), "£20");
        assert_eq!(format_money(10.0, 2, "£"), "£10.00");
        assert_eq!(format_money(1234567.891, 0, "£"), "£1,234,568");
        assert_eq!(format_money(1234.5, 2, "$"), "$1,234.50");
        assert_eq!(format_money(-27.5, 2, "£"), "£-27.50");
        assert_eq!(format_money(-0.4, 0, "£"), "£0");
        assert_eq!(format_money(0.0, 2, ""), "0.00");
    }
}
