//! Integration tests for the bkt CLI
//!
//! These tests require a running S3-compatible server and an existing,
//! disposable bucket. Every object in that bucket is deleted by the tests.
//!
//! Run with:
//! ```bash
//! # Start RustFS container
//! docker run -d --name rustfs -p 9000:9000 -p 9001:9001 \
//!     -v rustfs-data:/data \
//!     -e RUSTFS_ACCESS_KEY=accesskey \
//!     -e RUSTFS_SECRET_KEY=secretkey \
//!     rustfs/rustfs:1.0.0-alpha.81
//!
//! # Run tests
//! TEST_S3_ENDPOINT=http://localhost:9000 TEST_S3_ACCESS_KEY=accesskey \
//! TEST_S3_SECRET_KEY=secretkey TEST_S3_BUCKET=bkt-test \
//! cargo test --features integration
//! ```

#![cfg(feature = "integration")]

use std::path::Path;
use std::process::{Command, Output};
use std::sync::Mutex;
use std::time::Duration;

use tempfile::TempDir;

/// The tests share one bucket, and `delete .` clears all of it
static BUCKET_LOCK: Mutex<()> = Mutex::new(());

struct TestConfig {
    endpoint: String,
    access_key: String,
    secret_key: String,
    bucket: String,
}

/// Get S3 test configuration from environment
fn get_test_config() -> Option<TestConfig> {
    Some(TestConfig {
        endpoint: std::env::var("TEST_S3_ENDPOINT").ok()?,
        access_key: std::env::var("TEST_S3_ACCESS_KEY").ok()?,
        secret_key: std::env::var("TEST_S3_SECRET_KEY").ok()?,
        bucket: std::env::var("TEST_S3_BUCKET").unwrap_or_else(|_| "bkt-test".to_string()),
    })
}

/// Run bkt in `workdir` against the test server
fn run_bkt(args: &[&str], config: &TestConfig, workdir: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bkt"));
    cmd.args(args)
        .current_dir(workdir)
        .env_remove("CLOUDFRONT_DISTRIBUTION_ID")
        .env_remove("LOCAL_BUCKET_PATH")
        .env_remove("BUCKET_IGNORE_FILE")
        .env_remove("BKT_CONFIG")
        .env("HOME", workdir)
        .env("XDG_CONFIG_HOME", workdir.join(".config"))
        .env("S3_BUCKET_NAME", &config.bucket)
        .env("S3_ENDPOINT_URL", &config.endpoint)
        .env("AWS_REGION", "us-east-1")
        .env("AWS_ACCESS_KEY_ID", &config.access_key)
        .env("AWS_SECRET_ACCESS_KEY", &config.secret_key);

    cmd.output().expect("Failed to execute bkt command")
}

/// Wait for the S3 service to respond to list requests
fn wait_for_s3_ready(config: &TestConfig, workdir: &Path) -> bool {
    for _ in 0..30 {
        if run_bkt(&["view", "--json"], config, workdir).status.success() {
            return true;
        }
        std::thread::sleep(Duration::from_secs(1));
    }
    false
}

/// Test helper: lock the bucket, empty it and return a scratch directory
fn setup() -> Option<(std::sync::MutexGuard<'static, ()>, TestConfig, TempDir)> {
    let config = get_test_config()?;
    let guard = BUCKET_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let workdir = tempfile::tempdir().ok()?;

    if !wait_for_s3_ready(&config, workdir.path()) {
        eprintln!("S3 service did not become ready in time");
        return None;
    }

    let output = run_bkt(&["delete", "."], &config, workdir.path());
    if !output.status.success() {
        eprintln!(
            "Failed to empty bucket: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        return None;
    }

    Some((guard, config, workdir))
}

fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn listed_keys(config: &TestConfig, workdir: &Path) -> Vec<String> {
    let output = run_bkt(&["view", "--json"], config, workdir);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    json["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["key"].as_str().unwrap().to_string())
        .collect()
}

mod sync_operations {
    use super::*;

    #[test]
    fn test_upload_view_restore_delete() {
        let Some((_guard, config, workdir)) = setup() else {
            eprintln!("Skipping: S3 test config not available");
            return;
        };
        let root = workdir.path().join("bucket");
        write_file(&root, "index.html", "<h1>hi</h1>");
        write_file(&root, "css/site.css", "body {}");
        write_file(&root, "drafts/todo.md", "later");
        write_file(&root, "notes.tmp", "scratch");
        std::fs::write(workdir.path().join(".bucketignore"), "drafts/*\n*.tmp\n").unwrap();

        let output = run_bkt(&["upload", ".", "--json"], &config, workdir.path());
        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["summary"]["succeeded"], 2);
        assert_eq!(json["summary"]["skipped"], 2);

        assert_eq!(
            listed_keys(&config, workdir.path()),
            vec!["css/site.css".to_string(), "index.html".to_string()]
        );

        std::fs::remove_dir_all(&root).unwrap();
        let output = run_bkt(&["restore", "."], &config, workdir.path());
        assert!(output.status.success());
        assert_eq!(
            std::fs::read_to_string(root.join("css/site.css")).unwrap(),
            "body {}"
        );
        assert!(!root.join("drafts").exists());

        let output = run_bkt(&["delete", "."], &config, workdir.path());
        assert!(output.status.success());
        assert!(listed_keys(&config, workdir.path()).is_empty());
    }

    #[test]
    fn test_single_key_round_trip() {
        let Some((_guard, config, workdir)) = setup() else {
            eprintln!("Skipping: S3 test config not available");
            return;
        };
        let root = workdir.path().join("bucket");
        write_file(&root, "docs/readme.txt", "v1");

        let output = run_bkt(&["upload", "./docs/readme.txt"], &config, workdir.path());
        assert!(output.status.success());

        write_file(&root, "docs/readme.txt", "local edit");
        let output = run_bkt(&["restore", "docs/readme.txt"], &config, workdir.path());
        assert!(output.status.success());
        assert_eq!(
            std::fs::read_to_string(root.join("docs/readme.txt")).unwrap(),
            "v1"
        );

        let output = run_bkt(&["delete", "docs/readme.txt"], &config, workdir.path());
        assert!(output.status.success());
        assert!(listed_keys(&config, workdir.path()).is_empty());
    }
}

mod empty_bucket {
    use super::*;

    #[test]
    fn test_empty_bucket_messages() {
        let Some((_guard, config, workdir)) = setup() else {
            eprintln!("Skipping: S3 test config not available");
            return;
        };

        let output = run_bkt(&["view"], &config, workdir.path());
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("is empty."));

        let output = run_bkt(&["delete", "."], &config, workdir.path());
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("Bucket is already empty."));

        let output = run_bkt(&["restore", "."], &config, workdir.path());
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("Nothing to download."));
    }
}

mod error_handling {
    use super::*;

    #[test]
    fn test_restore_missing_key() {
        let Some((_guard, config, workdir)) = setup() else {
            eprintln!("Skipping: S3 test config not available");
            return;
        };

        let output = run_bkt(&["restore", "nope.txt"], &config, workdir.path());
        assert!(!output.status.success());
        assert!(!workdir.path().join("bucket/nope.txt").exists());
    }
}
