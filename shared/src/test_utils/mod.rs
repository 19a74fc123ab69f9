pub mod http_test_utils;
pub mod mock_store;
pub mod mongo_test_utils;
pub mod test_logging;
