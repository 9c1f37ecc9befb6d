//! Module for locating the compiler metadata tail in hex bytecode and returning the
//! reachable prefix that precedes it.
//!
//! Solidity appends a CBOR-encoded metadata blob after the last reachable instruction.
//! Nothing in that tail is ever executed, so a DELEGATECALL byte that only occurs there
//! is noise, not evidence. Stripping is a syntactic operation: everything before the
//! CBOR/IPFS marker is kept, everything from the marker on is dropped.

/// CBOR map header plus the `ipfs` key marker emitted by solc (`a2 64 69 70 66 73 58`).
pub const METADATA_MARKER: [u8; 7] = [0xa2, 0x64, 0x69, 0x70, 0x66, 0x73, 0x58];

/// The same marker as lowercase hex text, for inputs that cannot be decoded cleanly.
const METADATA_MARKER_HEX: &str = "a2646970667358";

/// Removes surrounding quotes and an optional `0x`/`0X` prefix from a hex string.
///
/// Build artifacts reach us in slightly different shapes (raw strings, quoted JSON
/// fragments, prefixed or not), so every hex consumer in the crate funnels through here.
pub fn normalize_hex(raw: &str) -> &str {
    let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
}

/// Returns the prefix of `raw` that precedes the compiler metadata marker.
///
/// The input is normalized first (quotes and `0x` prefix removed). If the marker is
/// absent the normalized input is returned unchanged, original case preserved. The
/// result never contains the marker, so the function is idempotent on its own output.
pub fn strip_metadata(raw: &str) -> &str {
    let hexstr = normalize_hex(raw);
    if hexstr.is_empty() {
        return hexstr;
    }
    match marker_offset(hexstr) {
        Some(at) => &hexstr[..at],
        None => hexstr,
    }
}

/// Character offset of the metadata marker within `hexstr`, aligned to byte pairs.
///
/// Clean hex is decoded and searched as bytes; inputs that do not decode (odd length,
/// stray characters) get a case-insensitive text search restricted to even offsets so
/// the match still lands on a byte boundary.
fn marker_offset(hexstr: &str) -> Option<usize> {
    if hexstr.len() % 2 == 0 {
        if let Ok(bytes) = hex::decode(hexstr.to_ascii_lowercase()) {
            return find_subslice(&bytes, &METADATA_MARKER).map(|i| i * 2);
        }
    }

    let lower = hexstr.to_ascii_lowercase();
    let mut from = 0;
    while let Some(rel) = lower[from..].find(METADATA_MARKER_HEX) {
        let at = from + rel;
        if at % 2 == 0 {
            return Some(at);
        }
        from = at + 1;
    }
    None
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
