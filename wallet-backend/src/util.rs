//! Address and hex-quantity helpers shared across the backend.

/// Normalize a hex address for use as a map key or comparison operand.
/// Lowercases the input; idempotent.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Whether the string is a 0x-prefixed 20-byte hex address.
pub fn is_valid_address(address: &str) -> bool {
    let Some(body) = address.strip_prefix("0x") else {
        return false;
    };
    body.len() == 40 && hex::decode(body).is_ok()
}

/// Whether the string is a 0x-prefixed 32-byte hex hash.
pub fn is_valid_tx_hash(hash: &str) -> bool {
    let Some(body) = hash.strip_prefix("0x") else {
        return false;
    };
    body.len() == 64 && hex::decode(body).is_ok()
}

/// Format an integer as a 0x-prefixed hex quantity (no leading zeros),
/// the JSON-RPC wire encoding.
pub fn format_hex_quantity(value: u128) -> String {
    format!("0x{:x}", value)
}

/// Parse a JSON-RPC hex quantity. Accepts the bare `0x` the wire never
/// produces but rejects anything non-hex.
pub fn parse_hex_quantity(value: &str) -> Result<u128, String> {
    let body = value
        .strip_prefix("0x")
        .ok_or_else(|| format!("Quantity '{}' missing 0x prefix", value))?;
    if body.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(body, 16).map_err(|e| format!("Invalid hex quantity '{}': {}", value, e))
}

/// Parse a decimal wei amount as provided by the UI.
pub fn parse_wei(value: &str) -> Result<u128, String> {
    value
        .trim()
        .parse::<u128>()
        .map_err(|e| format!("Invalid wei amount '{}': {}", value, e))
}
