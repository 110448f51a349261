pub mod environment;
pub mod paths;
pub mod terminal;

pub use environment::{get_api_url, get_data_dir, get_log_path};
pub use paths::{format_path_with_tilde, is_safe_identifier, validate_file_size};
pub use terminal::{single_line, strip_ansi_codes, truncate_chars};
