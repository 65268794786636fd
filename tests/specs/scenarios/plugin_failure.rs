//! Scenario: the `snap` plugin exits with a non-zero status. The
//! failure must propagate up through `bk_single_full` to the root
//! schedule as `ESUB`, without ever spawning `export`.

use xcore_core::job::JobConfig;
use xcore_core::Error as CoreError;

use crate::harness::Scenario;

const PLUGIN_ARG: &str = r#"{"sp_name":"failing","tp_name":"dummy"}"#;

#[tokio::test]
#[ignore]
async fn snap_plugin_failure_propagates_esub_to_the_root() {
    let s = Scenario::new().await;
    s.write_plugin("failing", 2, "cat meta/arg > meta/arg.out\necho 5 > meta/status");
    s.write_plugin("dummy", 1, "cat meta/arg > meta/arg.out\necho 0 > meta/status");

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
    assert_eq!(root.result, CoreError::ESub.code(), "root: {root:?}");

    let full = s.fetch(root.sub).await;
    assert!(full.done);
    assert_eq!(full.result, CoreError::ESub.code());

    let snap = s.fetch(full.sub).await;
    assert!(snap.done);
    assert_eq!(snap.result, 5);
    assert!(snap.next.is_none(), "export must not be spawned on failure");
}
