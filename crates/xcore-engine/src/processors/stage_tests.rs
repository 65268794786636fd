use super::*;
use crate::processors::test_harness::{harness, Harness};
use xcore_core::job::JobConfig;

const PLUGIN_ARG: &str = r#"{"sp_name":"dummy","tp_name":"dummy"}"#;

async fn tick(h: &Harness, proc: &dyn Processor, job_id: JobId) {
    let mut tx = h.store.begin().await.unwrap();
    {
        let mut ctx = ProcCtx {
            tx: &mut tx,
            clock: &h.clock,
            workdir: &h.workdir,
            registry: &h.registry,
            supervisor: &h.supervisor,
        };
        proc.run(&mut ctx, job_id).await.unwrap();
    }
    tx.commit().await.unwrap();
}

async fn wait_done(h: &Harness, proc: &dyn Processor, job_id: JobId) -> Job {
    for _ in 0..50 {
        tick(h, proc, job_id).await;
        let mut tx = h.store.begin().await.unwrap();
        let job = tx.fetch(job_id).await.unwrap();
        tx.rollback().await.unwrap();
        if job.done {
            return job;
        }
    }
    panic!("job {job_id} never reached DONE");
}

#[tokio::test]
#[ignore]
async fn snap_runs_to_completion_with_no_follow_on() {
    let h = harness().await;
    let mut tx = h.store.begin().await.unwrap();
    let job_id = tx
        .insert(JobConfig::new("snap").with_plugin_arg(PLUGIN_ARG))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let proc = StageProcessor::snap();
    let job = wait_done(&h, &proc, job_id).await;
    assert_eq!(job.result, 0);
    assert!(job.next.is_none());
}

#[tokio::test]
#[ignore]
async fn export_spawns_put_and_propagates_its_result() {
    let h = harness().await;
    let mut tx = h.store.begin().await.unwrap();
    // A stand-in parent so `put`'s data-handoff lookup (walk the shared
    // parent's sub/next chain) has something to walk — in the real tree
    // this role is played by `bk_single_full`.
    let parent_id = tx.insert(JobConfig::new("bk_single_full")).await.unwrap();
    let job_id = tx
        .insert(JobConfig::new("export").with_plugin_arg(PLUGIN_ARG))
        .await
        .unwrap();
    let mut export_row = tx.fetch(job_id).await.unwrap();
    export_row.parent = parent_id;
    tx.update_structural(&export_row).await.unwrap();
    let mut parent_row = tx.fetch(parent_id).await.unwrap();
    parent_row.sub = job_id;
    tx.update_structural(&parent_row).await.unwrap();
    tx.commit().await.unwrap();

    // export's own RUN->TERM step spawns `put`; drive both processors
    // in lockstep until the parent reaches DONE.
    let export = StageProcessor::export();
    let put = StageProcessor::put();
    let mut job = None;
    for _ in 0..50 {
        tick(&h, &export, job_id).await;
        let mut tx = h.store.begin().await.unwrap();
        let row = tx.fetch(job_id).await.unwrap();
        tx.rollback().await.unwrap();
        if row.next.is_some() {
            tick(&h, &put, row.next).await;
        }
        if row.done {
            job = Some(row);
            break;
        }
    }
    let job = job.expect("export job never reached DONE");
    assert_eq!(job.result, 0);
}
