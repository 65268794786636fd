//! Scenario: insert a one-shot backup schedule and expect the whole
//! tree — schedule, instance, snap, export, put — to reach
//! `done=1, result=0` within a bounded number of ticks.

use xcore_core::job::JobConfig;

use crate::harness::{Scenario, ECHO_PLUGIN};

const PLUGIN_ARG: &str = r#"{"sp_name":"dummy","tp_name":"dummy"}"#;

#[tokio::test]
#[ignore]
async fn immediate_one_shot_backup_completes_the_whole_tree() {
    let s = Scenario::new().await;
    s.write_plugin("dummy", 1, ECHO_PLUGIN);

    let mut tx = s.store.begin().await.unwrap();
    let root_id = tx
        .insert(
            JobConfig::new("bk_single_sched")
                .with_params(r#"{"sched_time":0,"full_bk_intvl":0,"incr_bk_intvl":0,"count":1}"#)
                .with_plugin_arg(PLUGIN_ARG),
        )
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let root = s.run_until(root_id, 500, |j| j.done).await;
    assert_eq!(root.result, 0, "root never reached result=0: {root:?}");

    let full = s.fetch(root.sub).await;
    assert!(full.done && full.result == 0);
    let snap = s.fetch(full.sub).await;
    assert!(snap.done && snap.result == 0);
    let export = s.fetch(snap.next).await;
    assert!(export.done && export.result == 0);
    let put = s.fetch(export.next).await;
    assert!(put.done && put.result == 0);
}
