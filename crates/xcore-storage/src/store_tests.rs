use super::*;

// These exercise real MySQL semantics (FOR UPDATE locking, LAST_INSERT_ID
// self-rooting, lock-wait timeout) that a fake can't stand in for, so
// they run only against a live database pointed at by DATABASE_URL.
// `cargo test -- --ignored` with a disposable MySQL instance exercises
// them; CI without one skips them by default.

async fn test_store() -> JobStore {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must point at a disposable MySQL instance for these tests");
    JobStore::connect(&url).await.unwrap()
}

#[tokio::test]
#[ignore]
async fn insert_self_roots_the_new_row() {
    let store = test_store().await;
    let mut tx = store.begin().await.unwrap();
    let cfg = JobConfig::new("bk_single_sched").with_params("{}");
    let id = tx.insert(cfg).await.unwrap();
    let job = tx.fetch(id).await.unwrap();
    tx.rollback().await.unwrap();

    assert_eq!(job.parent, id);
    assert_eq!(job.grp, id);
    assert_eq!(job.root, id);
}

#[tokio::test]
#[ignore]
async fn count_undone_subs_counts_still_running_children() {
    let store = test_store().await;
    let mut tx = store.begin().await.unwrap();
    let parent = tx.insert(JobConfig::new("bk_single_full")).await.unwrap();
    let mut child = tx.fetch(parent).await.unwrap();
    child.parent = parent;
    let child_id = tx.insert(JobConfig::new("snap")).await.unwrap();
    let mut child_row = tx.fetch(child_id).await.unwrap();
    child_row.parent = parent;
    tx.update_structural(&child_row).await.unwrap();

    let undone = tx.count_undone_subs(parent).await.unwrap();
    tx.rollback().await.unwrap();
    assert_eq!(undone, 1);
}

#[tokio::test]
#[ignore]
async fn allocate_id_skips_done_rows() {
    let store = test_store().await;
    let mut tx = store.begin().await.unwrap();
    let id = tx.insert(JobConfig::new("snap")).await.unwrap();
    let next = tx.allocate_id(id.get() - 1).await.unwrap();
    tx.rollback().await.unwrap();
    assert_eq!(next, Some(id));
}
