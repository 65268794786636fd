//! Scenario: a restore whose `rstr_to_job_id` names a job that isn't
//! an `export` must fail immediately, before ever spawning a `get`
//! child, with `EINVREC`.

use xcore_core::job::JobConfig;
use xcore_core::Error as CoreError;

use crate::harness::Scenario;

#[tokio::test]
#[ignore]
async fn restore_pointing_at_a_non_export_job_fails_without_spawning_get() {
    let s = Scenario::new().await;

    let mut tx = s.store.begin().await.unwrap();
    // A plain snap job: it exists, but it isn't an export.
    let snap_id = tx.insert(JobConfig::new("snap")).await.unwrap();
    let rstr_id = tx
        .insert(JobConfig::new("rstr_single").with_params(format!(
            r#"{{"rstr_to_job_id":{}}}"#,
            snap_id.get()
        )))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let job = s.run_until(rstr_id, 50, |j| j.done).await;
    assert!(job.done, "restore never finished: {job:?}");
    assert_eq!(job.result, CoreError::EInvRec.code());
    assert!(job.sub.is_none(), "no get child should have been spawned");
}
