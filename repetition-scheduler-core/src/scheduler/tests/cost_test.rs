use crate::model::configuration::AbsenceMode;
use crate::model::instance::Assignment;
use crate::scheduler::cost::{
    CostEvaluator, HARD_ABSENCE_PENALTY, SLOT_CLASH_PENALTY, SOFT_ABSENCE_PENALTY,
};
use crate::scheduler::tests::instance_mock::{config, instance, strict_config};

const S0: &str = "LUN_05_10:00-12:00";
const S1: &str = "LUN_05_14:00-16:00";
const S2: &str = "LUN_05_16:00-18:00";
const OTHER_DAY: &str = "MAR_06_10:00-12:00";

#[test]
fn test_strict_mode_weighs_each_absence_hard() {
    let instance = instance(
        &[("P1", &["A", "B"])],
        &[S0],
        &[("A", S0, "no"), ("B", S0, "no")],
    );
    let config = strict_config();
    let mut evaluator = CostEvaluator::new(&instance, &config);
    let assignment = Assignment::empty(1);
    // Legacy hard-constraint regime: 10 000 per "no".
    assert_eq!(
        evaluator.cost(&assignment, 0, 0),
        2 * HARD_ABSENCE_PENALTY
    );
}

#[test]
fn test_flexible_mode_counts_absences_against_threshold() {
    let instance = instance(
        &[("P1", &["A", "B", "C"])],
        &[S0],
        &[("A", S0, "no"), ("B", S0, "no"), ("C", S0, "yes")],
    );
    let mut config = config();
    config.absence_mode = AbsenceMode::Flexible;
    config.absence_threshold = 1;
    let mut evaluator = CostEvaluator::new(&instance, &config);
    let assignment = Assignment::empty(1);
    // Two tolerated-cost absences, one of them above the threshold.
    assert_eq!(
        evaluator.cost(&assignment, 0, 0),
        2 * SOFT_ABSENCE_PENALTY + HARD_ABSENCE_PENALTY
    );
}

#[test]
fn test_maybe_penalty_per_musician() {
    let instance = instance(
        &[("P1", &["A", "B"])],
        &[S0],
        &[("A", S0, "maybe"), ("B", S0, "maybe")],
    );
    let mut config = config();
    config.maybe_penalty = 7;
    let mut evaluator = CostEvaluator::new(&instance, &config);
    let assignment = Assignment::empty(1);
    assert_eq!(evaluator.cost(&assignment, 0, 0), 14);
}

#[test]
fn test_special_slot_relaxes_strict_mode() {
    let instance = instance(
        &[("P1", &["A", "B"])],
        &[S0],
        &[("A", S0, "no"), ("B", S0, "yes")],
    );
    let mut config = strict_config();
    config.special_slots = vec![S0.to_string()];
    config.special_absence_threshold = 2;
    let mut evaluator = CostEvaluator::new(&instance, &config);
    let assignment = Assignment::empty(1);
    // On a special slot the absence costs 100, and the count stays under
    // the relaxed threshold.
    assert_eq!(evaluator.cost(&assignment, 0, 0), SOFT_ABSENCE_PENALTY);
}

#[test]
fn test_special_slot_threshold_still_binds() {
    let instance = instance(
        &[("P1", &["A", "B", "C"])],
        &[S0],
        &[("A", S0, "no"), ("B", S0, "no"), ("C", S0, "no")],
    );
    let mut config = strict_config();
    config.special_slots = vec![S0.to_string()];
    config.special_absence_threshold = 1;
    let mut evaluator = CostEvaluator::new(&instance, &config);
    let assignment = Assignment::empty(1);
    assert_eq!(
        evaluator.cost(&assignment, 0, 0),
        3 * SOFT_ABSENCE_PENALTY + 2 * HARD_ABSENCE_PENALTY
    );
}

#[test]
fn test_slot_exclusivity_dominates() {
    let instance = instance(
        &[("P1", &["A"]), ("P2", &["B"])],
        &[S0],
        &[("A", S0, "yes"), ("B", S0, "yes")],
    );
    let config = config();
    let mut evaluator = CostEvaluator::new(&instance, &config);
    let mut assignment = Assignment::empty(2);
    assignment.set(1, Some(0));
    assert_eq!(evaluator.cost(&assignment, 0, 0), SLOT_CLASH_PENALTY);
}

#[test]
fn test_daily_load_excludes_the_piece_under_evaluation() {
    let instance = instance(
        &[("P1", &["A"]), ("P2", &["A"]), ("P3", &["A"])],
        &[S0, S1, S2, OTHER_DAY],
        &[
            ("A", S0, "yes"),
            ("A", S1, "yes"),
            ("A", S2, "yes"),
            ("A", OTHER_DAY, "yes"),
        ],
    );
    let mut config = config();
    config.max_load = 2;
    config.load_penalty = 50;
    config.group_bonus = 0;
    let mut evaluator = CostEvaluator::new(&instance, &config);

    let mut assignment = Assignment::empty(3);
    assignment.set(0, Some(0));
    assignment.set(1, Some(1));
    // Two other pieces already on the day: load 2 reaches the cap.
    assert_eq!(evaluator.cost(&assignment, 2, 2), 50);
    // On another day the load restarts from zero.
    assert_eq!(evaluator.cost(&assignment, 2, 3), 0);
    // P1's own placement never counts against itself.
    evaluator.invalidate();
    assert_eq!(evaluator.cost(&assignment, 0, 0), 0);
}

#[test]
fn test_adjacency_bonus_rewards_shared_neighbours() {
    let instance = instance(
        &[("P1", &["A"]), ("P2", &["A"])],
        &[S0, S1, S2],
        &[("A", S0, "maybe"), ("A", S1, "yes"), ("A", S2, "yes")],
    );
    let mut config = config();
    config.maybe_penalty = 30;
    config.group_bonus = 20;
    let mut evaluator = CostEvaluator::new(&instance, &config);

    let mut assignment = Assignment::empty(2);
    assignment.set(1, Some(1));
    // P2 sits in the adjacent slot: the maybe penalty is discounted.
    assert_eq!(evaluator.cost(&assignment, 0, 0), 10);
    // Cost never goes negative.
    evaluator.invalidate();
    assignment.set(1, Some(2));
    assert_eq!(evaluator.cost(&assignment, 0, 1), 0);
}

#[test]
fn test_single_slot_day_has_no_adjacency() {
    let instance = instance(
        &[("P1", &["A"]), ("P2", &["A"])],
        &[S0, OTHER_DAY],
        &[("A", S0, "maybe"), ("A", OTHER_DAY, "maybe")],
    );
    let mut config = config();
    config.group_bonus = 20;
    let mut evaluator = CostEvaluator::new(&instance, &config);
    let mut assignment = Assignment::empty(2);
    assignment.set(1, Some(1));
    // OTHER_DAY is alone on its day: no neighbour, no bonus anywhere.
    assert_eq!(evaluator.cost(&assignment, 0, 0), config.maybe_penalty);
}

#[test]
fn test_cache_soundness_after_invalidation() {
    let instance = instance(
        &[("P1", &["A"]), ("P2", &["A"])],
        &[S0, S1],
        &[
            ("A", S0, "yes"),
            ("A", S1, "yes"),
        ],
    );
    let config = config();
    let mut evaluator = CostEvaluator::new(&instance, &config);

    let mut assignment = Assignment::empty(2);
    assert_eq!(evaluator.cost(&assignment, 0, 0), 0);

    // Mutate the assignment, clear the cache, and compare against a cold
    // evaluator: the memoized path must agree with from-scratch costs.
    assignment.set(1, Some(0));
    evaluator.invalidate();
    let mut cold = CostEvaluator::new(&instance, &config);
    for piece in 0..2 {
        for slot in 0..2 {
            assert_eq!(
                evaluator.cost(&assignment, piece, slot),
                cold.cost(&assignment, piece, slot),
            );
        }
    }
    assert_eq!(evaluator.cost(&assignment, 0, 0), SLOT_CLASH_PENALTY);
}
