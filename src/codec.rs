use crate::config::cell_count;
use crate::error::{CrosswordError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Encode a cell layer as base64 of a `'0'`/`'1'` string, one char per cell.
pub fn encode_grid(bits: &[bool]) -> String {
    let bin: String = bits.iter().map(|&b| if b { '1' } else { '0' }).collect();
    STANDARD.encode(bin)
}

/// Decode a base64 grid payload; its length must be exactly `size * size`.
pub fn decode_grid(b64: &str, size: usize) -> Result<Vec<bool>> {
    let cells = cell_count(size)?;
    let raw = STANDARD
        .decode(b64.trim())
        .map_err(|e| CrosswordError::InvalidGridEncoding(e.to_string()))?;
    if raw.len() != cells {
        return Err(CrosswordError::InvalidGridEncoding(format!(
            "expected {} cells, decoded {}",
            cells,
            raw.len()
        )));
    }
    Ok(raw.iter().map(|&ch| ch == b'1').collect())
}

/// Decode a grid taken from a query string, which may still be percent-encoded.
pub fn decode_grid_param(raw: &str, size: usize) -> Result<Vec<bool>> {
    let unescaped = match urlencoding::decode(raw) {
        Ok(s) => s.into_owned(),
        Err(_) => raw.to_string(),
    };
    decode_grid(&unescaped, size)
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Short stable hash used to key per-grid data: `h = h * 31 + unit` over the
/// UTF-16 code units with 32-bit wraparound, rendered in base 36.
pub fn hash_base64(s: &str) -> String {
    let mut h: i32 = 0;
    for unit in s.encode_utf16() {
        h = h.wrapping_mul(31).wrapping_add(unit as i32);
    }
    to_base36((h as i64).unsigned_abs())
}

fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..36)] as char)
        .collect()
}

/// Six random uppercase base-36 characters.
pub fn generate_code() -> String {
    random_base36(6).to_uppercase()
}

/// Share code seeded by the grid hash: four hash chars then random fill.
pub fn generate_grid_code(grid_b64: &str) -> String {
    let hash: String = hash_base64(grid_b64).chars().take(4).collect();
    let mut code = format!("{}{}", hash, random_base36(4)).to_uppercase();
    code.truncate(6);
    code
}
