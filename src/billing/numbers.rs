// src/billing/numbers.rs

/// Bill number prefix carried over from the shop's legacy numbering.
pub const BILL_PREFIX: &str = "FC";

/// Formats a sequence value into a bill number, e.g. 7 -> "FC-00007".
pub fn format_bill_number(seq: i64) -> String {
    format!("{BILL_PREFIX}-{seq:05}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_five_digits() {
        assert_eq!(format_bill_number(1), "FC-00001");
        assert_eq!(format_bill_number(42), "FC-00042");
        assert_eq!(format_bill_number(123456), "FC-123456");
    }
}
