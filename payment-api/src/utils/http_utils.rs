use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint};
use num_traits::Num;

/// Lowercases an EVM address or hash so it can be used as a lookup key.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Returns true for a `0x`-prefixed, non-empty hexadecimal string.
pub fn is_hex_string(value: &str) -> bool {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(digits) => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Parses a quantity that can be an hexadecimal (`0x` prefixed) or decimal string.
pub fn parse_quantity(value: &str) -> Result<BigUint, String> {
    let value = value.trim();
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        // "0x" alone is how some nodes encode zero
        Some("") => Ok(BigUint::default()),
        Some(digits) => BigUint::from_str_radix(digits, 16),
        None => BigUint::from_str_radix(value, 10),
    };
    parsed.map_err(|_| format!("Invalid quantity: {}", value))
}

/// Converts an unsigned integer to a scale 0 decimal without going through floats.
pub fn to_big_decimal(value: &BigUint) -> BigDecimal {
    BigDecimal::new(BigInt::from(value.clone()), 0)
}
