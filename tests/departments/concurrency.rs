//! Concurrent writers racing on the same observed version.

use std::sync::Barrier;
use std::thread;

use academic_registry::{
    Course, Department, EntityStore, Registry, RegistryError, StoreError, UpdateDepartment,
    UpdateOutcome,
};

use crate::support::{fields, in_memory, seed_department};

const WRITERS: usize = 8;
const ROUNDS: u64 = 20;

/// All writers submit the same expected version at once. Returns the winner.
fn race_round<S: EntityStore>(registry: &Registry<S>, id: i64, expected: u64) -> Department {
    let barrier = Barrier::new(WRITERS);

    let outcomes: Vec<UpdateOutcome> = thread::scope(|s| {
        let handles: Vec<_> = (0..WRITERS)
            .map(|writer| {
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    let budget = 1_000.0 + writer as f64;
                    registry
                        .update_department(
                            id,
                            UpdateDepartment::new(fields("Contested", budget), expected),
                        )
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winners: Vec<Department> = outcomes
        .iter()
        .filter_map(|o| match o {
            UpdateOutcome::Updated(d) => Some(d.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(winners.len(), 1, "exactly one writer must win: {outcomes:?}");
    let winner = winners.into_iter().next().unwrap();
    assert_eq!(winner.version, expected + 1);

    for outcome in &outcomes {
        match outcome {
            UpdateOutcome::Updated(_) => {}
            UpdateOutcome::Conflict(current) => assert_eq!(current, &winner),
            UpdateOutcome::NotFound(id) => panic!("department {id} vanished mid-race"),
        }
    }

    assert_eq!(registry.get_department(id).unwrap(), winner);
    winner
}

fn repeated_races<S: EntityStore>(registry: Registry<S>) {
    let dept = seed_department(&registry, 1, 1, 100.0);

    let mut expected = dept.version;
    for _ in 0..ROUNDS {
        let winner = race_round(&registry, dept.department_id, expected);
        expected = winner.version;
    }
    assert_eq!(expected, 1 + ROUNDS);
}

#[test]
fn one_winner_per_version_in_memory() {
    repeated_races(in_memory());
}

#[cfg(feature = "sqlite")]
#[test]
fn one_winner_per_version_sqlite() {
    repeated_races(crate::support::sqlite());
}

/// A department delete racing a course insert for the same department must
/// end in one of two consistent states, never a course without its
/// department.
fn delete_races_course_insert<S: EntityStore>(registry: Registry<S>) {
    for round in 0..50_i64 {
        let dept = registry.create_department(fields("Racing", 1.0)).unwrap();
        let id = dept.department_id;
        let course_id = 10_000 + round;
        let barrier = Barrier::new(2);

        let (deleted, inserted) = thread::scope(|s| {
            let barrier = &barrier;
            let registry = &registry;
            let deleter = s.spawn(move || {
                barrier.wait();
                registry.delete_department(id).unwrap()
            });
            let inserter = s.spawn(move || {
                barrier.wait();
                registry.create_course(Course::new(course_id, "Late Arrival", 3, id))
            });
            (deleter.join().unwrap(), inserter.join().unwrap())
        });

        match inserted {
            Ok(_) => {
                assert!(!deleted.is_deleted(), "round {round}: deleted a referenced department");
                assert!(registry.get_department(id).is_ok());
            }
            Err(RegistryError::Store(StoreError::MissingReference { .. })) => {
                assert!(deleted.is_deleted());
                assert!(registry.get_course(course_id).is_err());
            }
            Err(other) => panic!("round {round}: unexpected error {other:?}"),
        }
    }
}

#[test]
fn delete_and_course_insert_never_orphan_in_memory() {
    delete_races_course_insert(in_memory());
}

#[cfg(feature = "sqlite")]
#[test]
fn delete_and_course_insert_never_orphan_sqlite() {
    delete_races_course_insert(crate::support::sqlite());
}
