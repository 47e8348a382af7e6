//! Property-based tests for the timetable engine.
//!
//! Uses proptest to check invariants of the encoding, the operators and the
//! penalty function over randomly shaped problems.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use u_timetable::domain::{LessonInstance, Room, Teacher, Timeslot, TimetableProblem};
use u_timetable::timetable::operators::{crossover, mutate};
use u_timetable::timetable::{random_genome, Evaluator, Gene, Genome};

/// `lessons` single-lesson classes of `students` each, `rooms` rooms of
/// 30 seats and `timeslots` timeslots, no teachers.
fn plain_problem(lessons: usize, rooms: usize, timeslots: usize, students: u32) -> TimetableProblem {
    let mut builder = TimetableProblem::builder();
    for i in 0..lessons {
        let class_id = format!("C{i}");
        builder = builder
            .lesson(LessonInstance::new(class_id.clone(), "math", 1))
            .class_size(class_id, students);
    }
    for r in 0..rooms {
        builder = builder.room(Room::new(format!("R{r}"), 30));
    }
    for t in 0..timeslots {
        builder = builder.timeslot(Timeslot::new(format!("T{t}"), "Monday"));
    }
    builder.build().expect("valid problem")
}

fn genes_strategy(len: usize, rooms: usize, timeslots: usize) -> impl Strategy<Value = Vec<Gene>> {
    prop::collection::vec(
        (0..rooms, 0..timeslots).prop_map(|(r, t)| Gene::new(r, t)),
        len,
    )
}

/// A problem shape together with a genome for it.
fn problem_and_genes() -> impl Strategy<Value = (usize, usize, usize, u32, Vec<Gene>)> {
    (1usize..12, 1usize..5, 1usize..6, 0u32..50).prop_flat_map(|(n, r, t, s)| {
        (Just(n), Just(r), Just(t), Just(s), genes_strategy(n, r, t))
    })
}

proptest! {
    // ==================== Genome Properties ====================

    #[test]
    fn random_genome_has_lesson_length_and_stays_in_domain(
        len in 1usize..60,
        rooms in 1usize..8,
        timeslots in 1usize..30,
        seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let genome = random_genome(rooms, timeslots, len, &mut rng);
        prop_assert_eq!(genome.len(), len);
        for gene in genome.genes() {
            prop_assert!(gene.room < rooms);
            prop_assert!(gene.timeslot < timeslots);
        }
    }

    // ==================== Operator Properties ====================

    #[test]
    fn crossover_keeps_genes_at_their_position(
        (g1, g2) in (1usize..40).prop_flat_map(|n| (genes_strategy(n, 5, 9), genes_strategy(n, 5, 9))),
        seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let p1 = Genome::new(g1);
        let p2 = Genome::new(g2);
        let (c1, c2) = crossover(&p1, &p2, &mut rng);

        prop_assert_eq!(c1.len(), p1.len());
        prop_assert_eq!(c2.len(), p2.len());
        for i in 0..p1.len() {
            let (a, b) = (p1.genes()[i], p2.genes()[i]);
            let (x, y) = (c1.genes()[i], c2.genes()[i]);
            prop_assert!((x == a && y == b) || (x == b && y == a));
        }
    }

    #[test]
    fn mutation_stays_in_domain(
        genes in genes_strategy(30, 4, 7),
        rate in 0.0f64..=1.0,
        seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let parent = Genome::new(genes);
        let child = mutate(&parent, 4, 7, rate, &mut rng);

        prop_assert_eq!(child.len(), parent.len());
        for (before, after) in parent.genes().iter().zip(child.genes()) {
            prop_assert!(after.room < 4 && after.timeslot < 7);
            // at most one coordinate is redrawn
            prop_assert!(before.room == after.room || before.timeslot == after.timeslot);
        }
    }

    // ==================== Penalty Properties ====================

    #[test]
    fn score_is_non_negative_and_sums_violations(
        (n, rooms, timeslots, students, genes) in problem_and_genes()
    ) {
        let problem = plain_problem(n, rooms, timeslots, students);
        let evaluation = Evaluator::new(&problem).evaluate(&genes);

        prop_assert!(evaluation.score >= 0.0);
        let total: f64 = evaluation.violations.iter().map(|v| v.penalty).sum();
        prop_assert!((evaluation.score - total).abs() < 1e-9);
        prop_assert_eq!(Evaluator::new(&problem).score(&genes), evaluation.score);
    }

    #[test]
    fn evaluation_is_deterministic(
        (n, rooms, timeslots, students, genes) in problem_and_genes()
    ) {
        let problem = plain_problem(n, rooms, timeslots, students);
        let evaluator = Evaluator::new(&problem);
        prop_assert_eq!(evaluator.evaluate(&genes), evaluator.evaluate(&genes));
    }

    #[test]
    fn room_double_booking_costs_ten_per_extra_lesson(
        (order, k) in (2usize..10).prop_flat_map(|n| {
            (Just((0..n).collect::<Vec<_>>()).prop_shuffle(), 2..=n)
        })
    ) {
        // 3 rooms × 4 timeslots leave enough free cells for the rest
        let n = order.len();
        let problem = plain_problem(n, 3, 4, 20);
        let mut genes = vec![Gene::new(0, 0); n];
        let mut free_cell = 1;
        for &lesson in &order[k..] {
            genes[lesson] = Gene::new(free_cell / 4, free_cell % 4);
            free_cell += 1;
        }

        let score = Evaluator::new(&problem).score(&genes);
        prop_assert_eq!(score, 10.0 * (k as f64 - 1.0));
    }

    #[test]
    fn conflict_free_genome_scores_zero(
        order in Just((0..12usize).collect::<Vec<_>>()).prop_shuffle(),
        n in 1usize..=12
    ) {
        let problem = plain_problem(n, 3, 4, 30);
        let genes: Vec<Gene> = order[..n]
            .iter()
            .map(|&cell| Gene::new(cell / 4, cell % 4))
            .collect();

        let evaluation = Evaluator::new(&problem).evaluate(&genes);
        prop_assert_eq!(evaluation.score, 0.0);
        prop_assert!(evaluation.violations.is_empty());
    }

    #[test]
    fn teacher_double_booking_costs_ten_per_extra_lesson(k in 2usize..8) {
        // every lesson in its own room, same timeslot, same teacher
        let mut builder = TimetableProblem::builder()
            .teacher(Teacher::new("P1"));
        for i in 0..k {
            builder = builder
                .lesson(LessonInstance::new(format!("C{i}"), "math", 1))
                .room(Room::new(format!("R{i}"), 30))
                .assign_teacher(i, "P1");
        }
        let problem = builder
            .timeslot(Timeslot::new("T0", "Monday"))
            .build()
            .expect("valid problem");
        let genes: Vec<Gene> = (0..k).map(|r| Gene::new(r, 0)).collect();

        let score = Evaluator::new(&problem).score(&genes);
        prop_assert_eq!(score, 10.0 * (k as f64 - 1.0));
    }
}
