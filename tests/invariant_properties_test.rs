//! Property tests: the engagement invariants hold after every commit, and a
//! rejected operation leaves the registries byte-for-byte unchanged, for
//! arbitrary sequences of assign/release calls over the demo fleet.

mod common;

use common::{assert_engagement_invariants, seeded_system, snapshot};
use dispatch_core::{CompletionReport, ReleaseOutcome};
use proptest::prelude::*;

const TASK_IDS: [&str; 5] = ["T01", "T02", "T03", "T04", "T05"];
const VEHICLE_IDS: [&str; 4] = ["V001", "V002", "V003", "V004"];

#[derive(Debug, Clone)]
enum Op {
    Assign { task: usize, vehicle: usize },
    Complete { task: usize, weight_dg: u32 },
    Cancel { task: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..TASK_IDS.len(), 0..VEHICLE_IDS.len())
            .prop_map(|(task, vehicle)| Op::Assign { task, vehicle }),
        // Weight in decigrams keeps the strategy integral; the engine sees kg
        (0..TASK_IDS.len(), 0u32..50_000).prop_map(|(task, weight_dg)| Op::Complete {
            task,
            weight_dg
        }),
        (0..TASK_IDS.len()).prop_map(|task| Op::Cancel { task }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn invariants_hold_after_every_commit(ops in proptest::collection::vec(op_strategy(), 1..40)) {
        let system = seeded_system();

        for op in ops {
            let before = snapshot(&system);
            let result = match op {
                Op::Assign { task, vehicle } => system
                    .assign(TASK_IDS[task], VEHICLE_IDS[vehicle])
                    .map(|_| ()),
                Op::Complete { task, weight_dg } => system
                    .report_completion(
                        TASK_IDS[task],
                        CompletionReport::with_weight(f64::from(weight_dg) / 10.0),
                    )
                    .map(|_| ()),
                Op::Cancel { task } => system
                    .release(TASK_IDS[task], ReleaseOutcome::Cancelled)
                    .map(|_| ()),
            };

            // Atomicity: a rejected operation mutates nothing
            if result.is_err() {
                prop_assert_eq!(snapshot(&system), before);
            }

            assert_engagement_invariants(&system);
        }
    }

    #[test]
    fn derived_sets_agree_with_fresh_reads(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let system = seeded_system();

        for op in ops {
            let _ = match op {
                Op::Assign { task, vehicle } => system
                    .assign(TASK_IDS[task], VEHICLE_IDS[vehicle])
                    .map(|_| ()),
                Op::Complete { task, weight_dg } => system
                    .report_completion(
                        TASK_IDS[task],
                        CompletionReport::with_weight(f64::from(weight_dg) / 10.0),
                    )
                    .map(|_| ()),
                Op::Cancel { task } => system
                    .release(TASK_IDS[task], ReleaseOutcome::Cancelled)
                    .map(|_| ()),
            };

            // The derived sets agree with the raw registries at every step
            let derived = system.derived();
            let fresh_eligible = system.eligible_vehicles();
            prop_assert_eq!(derived.eligible_vehicles, fresh_eligible);
            let fresh_pending = system.pending_unassigned_tasks(None);
            prop_assert_eq!(derived.pending_unassigned, fresh_pending);
        }
    }
}
