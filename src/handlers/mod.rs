
pub use api_test::{
    all_api_test, get_test_api_list, test_progress, AllApiTestParams, StartTestResponse,
    TestApiListResponse, TestProgressParams, TestProgressResponse,
};
