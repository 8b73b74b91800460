use chrono::{DateTime, Utc};
use rand::Rng;

/// Attempts made before a run of order-number collisions is reported as an error.
pub const MAX_ATTEMPTS: usize = 5;

const SUFFIX_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKind {
    ServiceBooking,
    Sparepart,
    Rental,
}

impl OrderKind {
    pub fn prefix(self) -> &'static str {
        match self {
            OrderKind::ServiceBooking => "ORD",
            OrderKind::Sparepart => "SP",
            OrderKind::Rental => "RNT",
        }
    }
}

/// `ORD-{millis}-{9 chars}`, `SP-{yyyyMMdd}-{4 digits}` or `RNT-{yyyyMMdd}-{4 digits}`.
/// Not collision free; callers retry on the unique constraint.
pub fn generate(kind: OrderKind, now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    match kind {
        OrderKind::ServiceBooking => {
            let suffix: String = (0..9)
                .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
                .collect();
            format!("{}-{}-{}", kind.prefix(), now.timestamp_millis(), suffix)
        }
        OrderKind::Sparepart | OrderKind::Rental => {
            let suffix: u16 = rng.gen_range(1000..10000);
            format!("{}-{}-{}", kind.prefix(), now.format("%Y%m%d"), suffix)
        }
    }
}
