/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Unix time lower bound for the next homework query (`from_date`).
pub type Cursor = i64;

/// The cursor a fresh process starts from.
pub fn initial_cursor() -> Cursor {
    chrono::Utc::now().timestamp()
}
