//! Availability probing through the real runner

#![cfg(unix)]

use codesearch_exec::{AvailabilityCache, ProbeSettings, Prober, TokioRunner};
use codesearch_testkit::{FakeEngine, temp_dir_in_workspace};
use std::sync::Arc;

fn prober(cache: Arc<AvailabilityCache>) -> Prober {
    Prober::new(Arc::new(TokioRunner), cache, ProbeSettings::default())
}

#[tokio::test]
async fn test_missing_binary_is_unavailable_and_memoized() {
    let temp = temp_dir_in_workspace();
    let cache = Arc::new(AvailabilityCache::new());
    let prober = prober(cache.clone());

    let available = prober
        .is_command_available("codesearch-definitely-missing-binary", temp.path())
        .await;

    assert!(!available);
    assert_eq!(
        cache.get(temp.path(), "codesearch-definitely-missing-binary"),
        Some(false)
    );
}

#[tokio::test]
async fn test_fake_engine_availability_follows_version_exit() {
    let temp = temp_dir_in_workspace();
    let good = FakeEngine::builder(temp.path(), "rg").build();
    let bad = FakeEngine::builder(temp.path(), "ast-grep")
        .unavailable()
        .build();
    let prober = prober(Arc::new(AvailabilityCache::new()));

    assert!(prober.is_command_available(&good.binary(), temp.path()).await);
    assert!(!prober.is_command_available(&bad.binary(), temp.path()).await);
}

#[tokio::test]
async fn test_memo_survives_binary_removal() {
    let temp = temp_dir_in_workspace();
    let engine = FakeEngine::builder(temp.path(), "rg").build();
    let prober = prober(Arc::new(AvailabilityCache::new()));

    assert!(prober.is_command_available(&engine.binary(), temp.path()).await);
    std::fs::remove_file(&engine.path).unwrap();
    // entries never expire
    assert!(prober.is_command_available(&engine.binary(), temp.path()).await);
}

#[tokio::test]
async fn test_plain_tempdir_is_not_a_git_repo() {
    let temp = tempfile::tempdir().unwrap();
    let prober = prober(Arc::new(AvailabilityCache::new()));
    assert!(!prober.is_inside_git_repo("git", temp.path()).await);
}
