//! Address display helpers.

/// Shorten an address to `0x1234...cdef`. Returns `None` for an empty address.
///
/// Addresses of ten characters or fewer are returned unchanged.
pub fn shorten_address(address: &str) -> Option<String> {
    if address.is_empty() {
        return None;
    }
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return Some(address.to_string());
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    Some(format!("{}...{}", head, tail))
}
