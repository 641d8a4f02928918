//! Adapter operations against a live SFTP server

use tempfile::TempDir;

use sftp_adapter::{EntryKind, HashAlgorithm, SftpDriver, SftpError};

use super::fixtures::{FIXTURE_ROOT, SftpTestEnvironment};

async fn connect() -> (SftpTestEnvironment, SftpDriver) {
    let env = SftpTestEnvironment::new()
        .await
        .expect("Failed to create test environment");
    let driver = SftpDriver::connect(&env.config())
        .await
        .expect("Connection should succeed");
    (env, driver)
}

fn fixture(rel: &str) -> String {
    format!("{}/{}", FIXTURE_ROOT, rel)
}

#[tokio::test]
async fn test_scan_lists_immediate_children() {
    skip_if_no_docker!();
    let (_env, driver) = connect().await;

    let entries = driver
        .scan_directory(&format!("{}/", fixture("a")), true, true, false)
        .await
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[&fixture("a/f.txt")].kind, EntryKind::File);
    assert_eq!(entries[&fixture("a/b")].kind, EntryKind::Dir);
}

#[tokio::test]
async fn test_recursive_scan() {
    skip_if_no_docker!();
    let (_env, driver) = connect().await;

    let entries = driver
        .scan_directory(&fixture("a"), true, true, true)
        .await
        .unwrap();
    assert!(entries.contains_key(&fixture("a/b/g.txt")));

    let folders_only = driver
        .scan_directory(&fixture("a"), false, true, true)
        .await
        .unwrap();
    assert!(folders_only.values().all(|e| e.kind == EntryKind::Dir));
}

#[tokio::test]
async fn test_existence_checks() {
    skip_if_no_docker!();
    let (_env, driver) = connect().await;

    assert!(driver.file_exists(&fixture("a/f.txt")).await.unwrap());
    assert!(!driver.folder_exists(&fixture("a/f.txt")).await.unwrap());
    assert!(driver.folder_exists(&fixture("a/b")).await.unwrap());
    assert!(!driver.file_exists(&fixture("missing")).await.unwrap());
    assert!(!driver.folder_exists(&fixture("missing")).await.unwrap());
}

#[tokio::test]
async fn test_hash_matches_download() {
    skip_if_no_docker!();
    let (_env, driver) = connect().await;

    let md5 = driver.hash(&fixture("a/f.txt"), "md5").await.unwrap();
    assert_eq!(md5, "8d777f385d3dfec8815d20f7496026dc");
    assert_eq!(driver.hash(&fixture("a/f.txt"), "crc32").await.unwrap(), "");

    let local = TempDir::new().unwrap();
    let target = local.path().join("f.txt");
    driver
        .download_file(&fixture("a/f.txt"), &target)
        .await
        .unwrap();
    assert_eq!(std::fs::read(&target).unwrap(), b"data");

    let sha1 = driver
        .hash_with(&fixture("a/f.txt"), HashAlgorithm::Sha1)
        .await
        .unwrap();
    assert_eq!(sha1, "a17c9aaa61e80a1bf71d0d850af4e5baa9800bbd");
}

#[tokio::test]
async fn test_download_missing_file_leaves_nothing() {
    skip_if_no_docker!();
    let (_env, driver) = connect().await;

    let local = TempDir::new().unwrap();
    let target = local.path().join("nothing.txt");
    let result = driver.download_file(&fixture("missing"), &target).await;

    assert!(matches!(result, Err(SftpError::Transfer { .. })));
    assert_eq!(std::fs::read_dir(local.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_details_and_permissions() {
    skip_if_no_docker!();
    let (_env, driver) = connect().await;

    let details = driver.get_details(&fixture("a/f.txt")).await.unwrap();
    assert_eq!(details.size, 4);
    assert_eq!(details.mime_type, "text/plain");
    assert!(details.modify_time.is_some());

    let perms = driver.get_permissions(&fixture("a/f.txt")).await.unwrap();
    assert!(perms.readable);

    let missing = driver.get_permissions(&fixture("missing")).await.unwrap();
    assert!(!missing.readable && !missing.writable);
}

#[tokio::test]
async fn test_create_folder() {
    skip_if_no_docker!();
    let (env, driver) = connect().await;
    let scratch = env.scratch_dir();

    let nested = format!("{}/x/y", scratch);
    let result = driver.create_folder(&nested, false).await;
    assert!(matches!(result, Err(SftpError::CreateFolder { .. })));

    let created = driver.create_folder(&nested, true).await.unwrap();
    assert_eq!(created, nested);
    assert!(driver.folder_exists(&nested).await.unwrap());

    // The chrooted login has no known identity, so only the listing counts
    let perms = driver.get_permissions(&nested).await.unwrap();
    assert!(perms.readable);
}
