use anyhow::Result;
use drive_gcs_sync::drive_service::SourceTree;
use drive_gcs_sync::storage_service::{ObjectStore, PutOutcome};
use std::path::Path;

use crate::common::fixtures::{file, folder, TEST_BUCKET};
use crate::common::mock_object_store::MockObjectStore;
use crate::common::mock_source_tree::MockSourceTree;

#[tokio::test]
async fn test_mock_source_tree_lists_registered_children() -> Result<()> {
    let source = MockSourceTree::new();
    source.add_folder("root", vec![folder("d", "dir"), file("f", "a.txt")]);

    let children = source.list_children("root").await?;

    assert_eq!(children.len(), 2);
    assert_eq!(children[0].name(), "dir");
    assert_eq!(children[1].id(), "f");
    assert_eq!(source.get_call_count("list_children"), 1);
    Ok(())
}

#[tokio::test]
async fn test_mock_source_tree_unknown_folder_fails() -> Result<()> {
    let source = MockSourceTree::new();
    let err = source.list_children("missing").await.unwrap_err();
    assert!(err.to_string().contains("missing"));
    Ok(())
}

#[tokio::test]
async fn test_mock_object_store_put_is_create_only() -> Result<()> {
    let store = MockObjectStore::new();
    let temp = tempfile::NamedTempFile::new()?;
    std::fs::write(temp.path(), b"abc")?;

    assert!(!store.object_exists(TEST_BUCKET, "k").await?);
    let first = store.put_object(TEST_BUCKET, "k", temp.path(), "text/plain").await?;
    let second = store.put_object(TEST_BUCKET, "k", temp.path(), "text/plain").await?;

    assert_eq!(first, PutOutcome::Created { bytes: 3 });
    assert_eq!(second, PutOutcome::AlreadyExists);
    assert!(store.object_exists(TEST_BUCKET, "k").await?);
    assert!(!store.object_exists("other-bucket", "k").await?);
    Ok(())
}

#[tokio::test]
async fn test_mock_object_store_requires_staged_file() -> Result<()> {
    let store = MockObjectStore::new();
    let result = store
        .put_object(TEST_BUCKET, "k", Path::new("/nonexistent/staged"), "text/plain")
        .await;
    assert!(result.is_err());
    Ok(())
}
