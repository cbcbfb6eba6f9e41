pub mod csv_parser;
pub mod file_source;
pub mod http_source;

pub use csv_parser::parse_studies_csv;
pub use file_source::FileStudySource;
pub use http_source::HttpStudySource;
