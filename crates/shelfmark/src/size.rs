//! Byte-size units and human-readable formatting.

/// One kibibyte (1024 bytes).
pub const KB: u64 = 1 << 10;
/// One mebibyte.
pub const MB: u64 = 1 << 20;
/// One gibibyte.
pub const GB: u64 = 1 << 30;
/// One tebibyte.
pub const TB: u64 = 1 << 40;
/// One pebibyte.
pub const PB: u64 = 1 << 50;

/// Format a byte count for error messages and logs.
///
/// Counts below 1 KB are rendered exactly (`"512 bytes"`, `"1 byte"`);
/// everything above picks the largest fitting unit with one decimal
/// (`"1.5 KB"`, `"2.0 MB"`).
pub fn format_size(bytes: u64) -> String {
    if bytes < KB {
        if bytes == 1 {
            "1 byte".to_string()
        } else {
            format!("{bytes} bytes")
        }
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes < TB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes < PB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else {
        format!("{:.1} PB", bytes as f64 / PB as f64)
    }
}
