//! Scenario: a plugin child is killed (SIGKILL) before it ever writes
//! `meta/status`. On the next poll, `kill(pid, 0)` fails, `waitpid`
//! reaps it, and the missing `meta/status` surfaces as `EBADJ` — the
//! `snap` job must land in `DONE` with that result rather than being
//! polled forever.

use xcore_core::job::JobConfig;
use xcore_core::Error as CoreError;

use crate::harness::Scenario;

const PLUGIN_ARG: &str = r#"{"sp_name":"sleepy","tp_name":"dummy"}"#;

#[tokio::test]
#[ignore]
async fn killed_child_before_status_write_terminates_with_ebadj() {
    let s = Scenario::new().await;
    // Never writes meta/status: this child is always "lost" once killed.
    s.write_plugin("sleepy", 3, "sleep 5");
    s.write_plugin("dummy", 1, "cat meta/arg > meta/arg.out\necho 0 > meta/status");

    let mut tx = s.store.begin().await.unwrap();
    let job_id = tx
        .insert(JobConfig::new("snap").with_plugin_arg(PLUGIN_ARG))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let mut dispatcher = s.dispatcher();

    // CREATED -> RUN: spawns the child and records its pid.
    assert!(dispatcher.tick().await.unwrap());
    let job = s.fetch(job_id).await;
    assert!(!job.done);

    let pid: i32 = {
        let raw = std::fs::read_to_string(s.workdir_root_of(job_id).join("meta/pid"))
            .expect("meta/pid must exist once the job is RUN");
        raw.trim().parse().expect("meta/pid must be an integer")
    };

    nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid), nix::sys::signal::Signal::SIGKILL)
        .expect("failed to kill the plugin child");

    // Give the kernel a moment to deliver the signal and reap the zombie.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let job = s.run_until(job_id, 200, |j| j.done).await;
    assert_eq!(job.result, CoreError::EBadJ.code(), "job: {job:?}");
}
