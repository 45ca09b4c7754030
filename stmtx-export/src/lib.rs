//! stmtx-export: CSV encoding and paginated previews of parsed statement rows

pub mod csv_encoder;
pub mod pager;

pub use csv_encoder::{csv_file_name, encode_csv, write_csv};
pub use pager::{DEFAULT_PAGE_SIZE, Page, Paginator};
