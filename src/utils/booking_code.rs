use rand::Rng;

pub const BOOKING_CODE_LENGTH: usize = 8;
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Random uppercase alphanumeric booking code. Uniqueness is checked by the caller.
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    (0..BOOKING_CODE_LENGTH)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}
