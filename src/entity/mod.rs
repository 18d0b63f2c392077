pub mod test_api;
