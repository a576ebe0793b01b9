mod log_table;

pub use log_table::{LogTableScreen, truncate};
