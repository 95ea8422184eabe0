mod discover;
mod reader;

pub use discover::discover_input_tables;
pub use reader::{normalize_ascii, read_records, read_records_from, sniff_delimiter};
