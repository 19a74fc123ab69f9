pub mod identity;
pub mod models;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
