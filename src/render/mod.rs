pub mod markdown;
pub mod plain;
pub mod time;
pub mod tui;
