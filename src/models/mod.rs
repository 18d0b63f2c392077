pub mod file_type;
pub mod test_api;

pub use api_test::*;
pub use file_type::*;
pub use test_api::*;
