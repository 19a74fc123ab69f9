use axum::Router;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use crate::routes::create_router_with_store;
use crate::upload::ImageUploader;
use volunteer_network_shared::store::mongo::MongoStore;
use volunteer_network_shared::test_utils::mock_store::MockStore;
use volunteer_network_shared::test_utils::mongo_test_utils::{create_mongo_store, use_mongodb};
use volunteer_network_shared::test_utils::test_logging::init_test_logging;

mod event_handlers_test;

pub(crate) const TEST_UPLOAD_LIMIT: usize = 1024 * 1024;

pub(crate) enum TestStore {
    Mock(Arc<MockStore>),
    MongoDB(Arc<MongoStore>),
}

pub(crate) struct TestApp {
    pub app: Router,
    pub store: TestStore,
    pub uploads: TempDir,
}

/// Builds the router over a mock store, or over MongoDB when `MONGODB_TEST_URI` is set.
/// Each test passes its own database name so parallel tests do not share collections.
pub(crate) async fn create_test_app(db_name: &str) -> TestApp {
    create_test_app_with_limit(db_name, TEST_UPLOAD_LIMIT).await
}

pub(crate) async fn create_test_app_with_limit(db_name: &str, upload_limit: usize) -> TestApp {
    init_test_logging();

    let uploads = tempfile::tempdir().unwrap();
    let uploader = ImageUploader::new(uploads.path());

    if use_mongodb() {
        info!("Using MongoDB database '{}' for handler tests", db_name);
        let store = Arc::new(create_mongo_store(db_name).await.unwrap());
        let app = create_router_with_store(store.clone(), uploader, upload_limit);
        TestApp {
            app,
            store: TestStore::MongoDB(store),
            uploads,
        }
    } else {
        debug!("Using mock store for handler tests");
        let store = Arc::new(MockStore::new());
        let app = create_router_with_store(store.clone(), uploader, upload_limit);
        TestApp {
            app,
            store: TestStore::Mock(store),
            uploads,
        }
    }
}

/// A mock-only app, for tests that need to inject store failures
pub(crate) fn create_mock_app() -> (Router, Arc<MockStore>, TempDir) {
    init_test_logging();

    let uploads = tempfile::tempdir().unwrap();
    let store = Arc::new(MockStore::new());
    let app = create_router_with_store(
        store.clone(),
        ImageUploader::new(uploads.path()),
        TEST_UPLOAD_LIMIT,
    );
    (app, store, uploads)
}

/// Every regular file under `root`, recursively
pub(crate) fn files_under(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files
}
