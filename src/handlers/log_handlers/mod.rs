pub mod daily_entry;
pub mod equipment;
pub mod logs;
