//! Short answer fingerprint stored next to the session id.

pub const FINGERPRINT_KEY: &str = "aurora_demo_fingerprint";

/// 31-multiplier string hash over UTF-16 code units with 32-bit
/// wraparound; the absolute value is printed in base 36.
pub fn simple_hash(input: &str) -> String {
    let mut h: i32 = 0;
    for unit in input.encode_utf16() {
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit));
    }
    to_base36(i64::from(h).unsigned_abs())
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_owned();
    }
    let mut out = Vec::with_capacity(8);
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}

/// Hashes `category:answers-as-digits:timestamp`.
pub fn create_fingerprint(category: &str, answers: [bool; 3], timestamp: i64) -> String {
    let digits: String = answers.iter().map(|a| if *a { '1' } else { '0' }).collect();
    simple_hash(&format!("{category}:{digits}:{timestamp}"))
}
