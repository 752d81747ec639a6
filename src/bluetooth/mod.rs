pub mod advertisement;
pub mod decoder;
pub mod scanner;

pub use advertisement::parse_advertisement;
pub use decoder::{decode_advertisement, decode_service_data, DecodeError};
pub use scanner::scan_for_readings;
