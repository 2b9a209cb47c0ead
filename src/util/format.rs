use git2::Oid;

/// Number of hex characters in an abbreviated commit id
pub const SHORT_HASH_LEN: usize = 7;

/// First seven hex characters of an object id
pub fn short_hash(oid: Oid) -> String {
    let mut hex = oid.to_string();
    hex.truncate(SHORT_HASH_LEN);
    hex
}

/// Byte count in binary units with one decimal, e.g. `1.5 KiB`; plain bytes below 1 KiB
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hash() {
        let oid = Oid::from_str("0123456789abcdef0123456789abcdef01234567").unwrap();
        assert_eq!(short_hash(oid), "0123456");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KiB");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
        assert_eq!(format_size(1024_u64.pow(4) * 2048), "2048.0 TiB");
    }
}
