//! Byte size units for the size range editor

use crate::constants::{BYTES_PER_GB, BYTES_PER_KB, BYTES_PER_MB, BYTES_PER_TB};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Bytes,
    Kilobytes,
    Megabytes,
    Gigabytes,
    Terabytes,
}

impl SizeUnit {
    pub const ALL: [SizeUnit; 5] = [
        SizeUnit::Bytes,
        SizeUnit::Kilobytes,
        SizeUnit::Megabytes,
        SizeUnit::Gigabytes,
        SizeUnit::Terabytes,
    ];

    pub fn factor(self) -> u64 {
        match self {
            SizeUnit::Bytes => 1,
            SizeUnit::Kilobytes => BYTES_PER_KB,
            SizeUnit::Megabytes => BYTES_PER_MB,
            SizeUnit::Gigabytes => BYTES_PER_GB,
            SizeUnit::Terabytes => BYTES_PER_TB,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SizeUnit::Bytes => "B",
            SizeUnit::Kilobytes => "KB",
            SizeUnit::Megabytes => "MB",
            SizeUnit::Gigabytes => "GB",
            SizeUnit::Terabytes => "TB",
        }
    }

    pub fn index(self) -> u32 {
        Self::ALL.iter().position(|u| *u == self).unwrap_or(0) as u32
    }

    pub fn from_index(index: u32) -> Self {
        Self::ALL
            .get(index as usize)
            .copied()
            .unwrap_or(SizeUnit::Bytes)
    }

    /// Largest unit in which `bytes` is still at least one
    pub fn best_for(bytes: u64) -> Self {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|u| bytes >= u.factor())
            .unwrap_or(SizeUnit::Bytes)
    }

    /// Convert an amount of this unit to bytes, saturating at `u64::MAX`
    pub fn to_bytes(self, amount: f64) -> u64 {
        let bytes = (amount.max(0.0) * self.factor() as f64).round();
        if bytes >= u64::MAX as f64 {
            u64::MAX
        } else {
            bytes as u64
        }
    }

    pub fn from_bytes(self, bytes: u64) -> f64 {
        bytes as f64 / self.factor() as f64
    }

    /// Decimal places shown for amounts of this unit
    pub fn digits(self) -> u32 {
        if self == SizeUnit::Bytes {
            0
        } else {
            1
        }
    }

    /// Text shown for `bytes` in this unit
    pub fn amount_text(self, bytes: u64) -> String {
        format!("{:.*}", self.digits() as usize, self.from_bytes(bytes))
    }

    /// Bytes for an amount read back from an editor that shows `current`
    ///
    /// An amount that displays the same as `current` is the rounded text of
    /// `current` read back, and maps to `current` exactly.
    pub fn bytes_for_amount(self, amount: f64, current: u64) -> u64 {
        let text = format!("{:.*}", self.digits() as usize, amount);
        if text == self.amount_text(current) {
            current
        } else {
            self.to_bytes(amount)
        }
    }
}

/// Format a byte count in human-readable form
pub fn format_size(bytes: u64) -> String {
    let unit = SizeUnit::best_for(bytes);
    if unit == SizeUnit::Bytes {
        format!("{} {}", bytes, unit.label())
    } else {
        format!("{:.1} {}", unit.from_bytes(bytes), unit.label())
    }
}

/// Which end of a range the user moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    Min,
    Max,
}

/// Keep `min <= max` by dragging the end that was not moved along
pub fn order_range(min: u64, max: u64, moved: RangeEnd) -> (u64, u64) {
    if min <= max {
        return (min, max);
    }
    match moved {
        RangeEnd::Min => (min, min),
        RangeEnd::Max => (max, max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * BYTES_PER_GB), "5.0 GB");
        assert_eq!(format_size(u64::MAX), "16777216.0 TB");
    }

    #[test]
    fn test_unit_conversion() {
        assert_eq!(SizeUnit::Megabytes.to_bytes(2.0), 2 * BYTES_PER_MB);
        assert_eq!(SizeUnit::Kilobytes.to_bytes(-1.0), 0);
        assert_eq!(SizeUnit::Terabytes.to_bytes(1e12), u64::MAX);
        assert_eq!(SizeUnit::Kilobytes.from_bytes(512), 0.5);
        assert_eq!(SizeUnit::from_index(SizeUnit::Gigabytes.index()), SizeUnit::Gigabytes);
        assert_eq!(SizeUnit::from_index(99), SizeUnit::Bytes);
    }

    #[test]
    fn test_rounded_text_keeps_exact_bytes() {
        let bytes = 1_536_000;
        let unit = SizeUnit::best_for(bytes);
        assert_eq!(unit, SizeUnit::Megabytes);

        let text = unit.amount_text(bytes);
        assert_eq!(text, "1.5");
        let amount: f64 = text.parse().unwrap();
        assert_ne!(unit.to_bytes(amount), bytes);
        assert_eq!(unit.bytes_for_amount(amount, bytes), bytes);

        // A real edit still converts
        assert_eq!(unit.bytes_for_amount(2.0, bytes), 2 * BYTES_PER_MB);
        assert_eq!(SizeUnit::Bytes.bytes_for_amount(12.0, 11), 12);
    }

    #[test]
    fn test_largest_value_survives_read_back() {
        let unit = SizeUnit::Terabytes;
        let amount: f64 = unit.amount_text(u64::MAX).parse().unwrap();
        assert_eq!(unit.bytes_for_amount(amount, u64::MAX), u64::MAX);
    }

    #[test]
    fn test_order_range() {
        assert_eq!(order_range(1, 5, RangeEnd::Min), (1, 5));
        assert_eq!(order_range(7, 5, RangeEnd::Min), (7, 7));
        assert_eq!(order_range(7, 5, RangeEnd::Max), (5, 5));
    }
}
