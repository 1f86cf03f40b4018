//! Outbound chat messaging (Telegram today).

pub mod port;
