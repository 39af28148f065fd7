use rust_decimal::Decimal;

/// Points without trailing zeros: "28", "3.5"
pub fn format_points(points: Decimal) -> String {
    points.normalize().to_string()
}

/// Ordinal place: "1st", "2nd", "3rd", "11th", "22nd"
pub fn format_place(place: u32) -> String {
    let suffix = match (place % 10, place % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", place, suffix)
}

/// Left-align `text` in a column exactly `width` characters wide, marking a
/// cut with a trailing '~' so long boat names keep their sail number
pub fn fit_column(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return format!("{:<width$}", text, width = width);
    }
    let mut fitted: String = text.chars().take(width.saturating_sub(1)).collect();
    if width > 0 {
        fitted.push('~');
    }
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(Decimal::from(28)), "28");
        assert_eq!(format_points(Decimal::new(350, 2)), "3.5");
        assert_eq!(format_points(Decimal::ZERO), "0");
    }

    #[test]
    fn test_format_place() {
        assert_eq!(format_place(1), "1st");
        assert_eq!(format_place(2), "2nd");
        assert_eq!(format_place(3), "3rd");
        assert_eq!(format_place(4), "4th");
        assert_eq!(format_place(11), "11th");
        assert_eq!(format_place(12), "12th");
        assert_eq!(format_place(13), "13th");
        assert_eq!(format_place(22), "22nd");
        assert_eq!(format_place(101), "101st");
        assert_eq!(format_place(111), "111th");
    }

    #[test]
    fn test_fit_column() {
        assert_eq!(fit_column("GBR 101", 10), "GBR 101   ");
        assert_eq!(fit_column("USA 2042 (J/70)", 10), "USA 2042 ~");
        assert_eq!(fit_column("NZL 7", 5), "NZL 7");
        assert_eq!(fit_column("NZL 7", 0), "");
    }
}
