pub mod download;
pub mod time;

pub use download::download_bytes;
pub use time::{date_input_value, format_timestamp, parse_date};
