pub mod test_api;

pub use test_api::TestApiRepository;
