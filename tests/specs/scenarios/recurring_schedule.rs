//! Scenario: a schedule with `count=3, full_bk_intvl=incr_bk_intvl=60`
//! chains three `bk_single_sched` instances via `next` — each waiting
//! for its own `sched_time` before spawning its own backup instance —
//! and every one of the three reaches `DONE` once its backup succeeds.

use xcore_core::job::JobConfig;

use crate::harness::{Scenario, ECHO_PLUGIN};

const PLUGIN_ARG: &str = r#"{"sp_name":"dummy","tp_name":"dummy"}"#;

#[tokio::test]
#[ignore]
async fn three_instance_schedule_chains_and_completes() {
    let s = Scenario::new().await;
    s.write_plugin("dummy", 1, ECHO_PLUGIN);

    let mut tx = s.store.begin().await.unwrap();
    let root_id = tx
        .insert(
            JobConfig::new("bk_single_sched")
                .with_params(r#"{"sched_time":0,"full_bk_intvl":60,"incr_bk_intvl":60,"count":3}"#)
                .with_plugin_arg(PLUGIN_ARG),
        )
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let mut dispatcher = s.dispatcher();

    for _ in 0..2000 {
        // Walk the chain of scheduled siblings fresh each round.
        let mut jobs = Vec::new();
        let mut cur = Some(root_id);
        while let Some(id) = cur {
            let job = s.fetch(id).await;
            cur = job.next.as_option();
            jobs.push(job);
        }

        if jobs.len() == 3 && jobs.iter().all(|j| j.done) {
            for j in &jobs {
                assert_eq!(j.result, 0, "schedule {} did not succeed: {j:?}", j.id);
            }
            return;
        }

        if !dispatcher.tick().await.unwrap() {
            // Catching up to the tail: advance the fake clock so the
            // next instance's `sched_time` comes due, and give any
            // in-flight plugin child a moment to exit.
            s.clock.advance_ms(60_000);
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
    }

    panic!("recurring schedule never chained to three completed instances");
}
