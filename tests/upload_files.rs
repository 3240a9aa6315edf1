mod common;

use common::{set, write, MemoryClient};
use composer_upload::{upload_files, StorageClient};
use std::collections::BTreeSet;
use tempfile::tempdir;

#[tokio::test]
async fn keys_are_relative_to_the_root_not_the_filesystem() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("deeply").join("nested").join("root");
    write(&root, "a.py", "");
    write(&root, "x/y/z.json", "{}");

    let files = vec![root.join("a.py"), root.join("x/y/z.json")];
    let client = MemoryClient::default();
    let bucket = client.bucket("mybucket").unwrap();

    let keys = upload_files(&bucket, &root, &files, "data").await.unwrap();

    let keys: BTreeSet<String> = keys.into_iter().collect();
    assert_eq!(keys, set(["data/a.py", "data/x/y/z.json"]));
    assert_eq!(client.keys(), keys);
}

#[tokio::test]
async fn file_outside_root_is_an_error() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("root");
    write(tmp.path(), "elsewhere.py", "");
    write(&root, "a.py", "");

    let client = MemoryClient::default();
    let bucket = client.bucket("mybucket").unwrap();

    let files = vec![tmp.path().join("elsewhere.py")];
    assert!(upload_files(&bucket, &root, &files, "dags").await.is_err());
    assert!(client.keys().is_empty());
}

#[tokio::test]
async fn nothing_to_upload_is_fine() {
    let tmp = tempdir().unwrap();
    let client = MemoryClient::default();
    let bucket = client.bucket("mybucket").unwrap();

    let keys = upload_files(&bucket, tmp.path(), &[], "dags").await.unwrap();
    assert!(keys.is_empty());
}
