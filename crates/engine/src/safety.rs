//! Safe-state detection and witness replay

use banker_types::{AllocationSnapshot, ProcessId, SafetyReport};
use thiserror::Error;

/// Search for an order in which every process can finish.
///
/// Each pass walks the unfinished processes in index order and lets every
/// process whose whole need fits in `work` finish, returning its allocation
/// to `work`. Passes repeat until one makes no progress. At most `n` passes
/// run, so the search is O(n² · m).
pub(crate) fn find_safe_sequence(
    available: &[u32],
    need: &[Vec<u32>],
    allocation: &[Vec<u32>],
) -> SafetyReport {
    let mut work = available.to_vec();
    let mut finished = vec![false; need.len()];
    let mut order = Vec::with_capacity(need.len());

    let mut progressed = true;
    while progressed {
        progressed = false;
        for (pid, row) in need.iter().enumerate() {
            if finished[pid] || !fits(row, &work) {
                continue;
            }
            release(&mut work, &allocation[pid]);
            finished[pid] = true;
            order.push(ProcessId(pid));
            progressed = true;
        }
    }

    if order.len() == need.len() {
        SafetyReport::Safe { sequence: order }
    } else {
        let blocked = finished
            .iter()
            .enumerate()
            .filter(|(_, done)| !**done)
            .map(|(pid, _)| ProcessId(pid))
            .collect();
        SafetyReport::Unsafe {
            finished: order,
            blocked,
        }
    }
}

fn fits(need: &[u32], work: &[u32]) -> bool {
    need.iter().zip(work).all(|(wanted, free)| wanted <= free)
}

fn release(work: &mut [u32], held: &[u32]) {
    for (free, units) in work.iter_mut().zip(held) {
        *free = free.saturating_add(*units);
    }
}

/// Why a proposed finishing order does not prove the state safe
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WitnessError {
    #[error("{process} is not a process of this allocator")]
    UnknownProcess { process: ProcessId },

    #[error("{process} appears more than once")]
    Duplicate { process: ProcessId },

    #[error("{process} cannot finish at step {step}: needs {needed} of resource {resource}, only {free} free")]
    NotEligible {
        process: ProcessId,
        step: usize,
        resource: usize,
        needed: u32,
        free: u32,
    },

    #[error("order covers {covered} of {processes} processes")]
    Incomplete { covered: usize, processes: usize },

    #[error("snapshot {what} has {actual} entries, expected {expected}")]
    MalformedSnapshot {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Every matrix must have one row per process and one column per class
fn check_shape(snapshot: &AllocationSnapshot) -> Result<(), WitnessError> {
    let processes = snapshot.process_count();
    let resources = snapshot.resource_count();
    for (what, rows) in [
        ("need rows", &snapshot.need),
        ("allocation rows", &snapshot.allocation),
    ] {
        if rows.len() != processes {
            return Err(WitnessError::MalformedSnapshot {
                what,
                expected: processes,
                actual: rows.len(),
            });
        }
    }
    for (what, rows) in [
        ("maximum row", &snapshot.maximum),
        ("need row", &snapshot.need),
        ("allocation row", &snapshot.allocation),
    ] {
        if let Some(row) = rows.iter().find(|row| row.len() != resources) {
            return Err(WitnessError::MalformedSnapshot {
                what,
                expected: resources,
                actual: row.len(),
            });
        }
    }
    Ok(())
}

/// Replay `sequence` against `snapshot` under the eligibility rule.
///
/// Succeeds only when every process appears exactly once and each one's
/// remaining need fits in the units free at its turn.
///
/// # Errors
///
/// Returns [`WitnessError::MalformedSnapshot`] when the snapshot's matrices
/// disagree on shape, otherwise the first violation found while replaying.
pub fn verify_sequence(
    snapshot: &AllocationSnapshot,
    sequence: &[ProcessId],
) -> Result<(), WitnessError> {
    check_shape(snapshot)?;
    let processes = snapshot.process_count();
    let mut work = snapshot.available.clone();
    let mut seen = vec![false; processes];

    for (step, &process) in sequence.iter().enumerate() {
        let pid = process.index();
        if pid >= processes {
            return Err(WitnessError::UnknownProcess { process });
        }
        if seen[pid] {
            return Err(WitnessError::Duplicate { process });
        }
        if let Some((resource, (&needed, &free))) = snapshot.need[pid]
            .iter()
            .zip(&work)
            .enumerate()
            .find(|(_, (needed, free))| needed > free)
        {
            return Err(WitnessError::NotEligible {
                process,
                step,
                resource,
                needed,
                free,
            });
        }
        release(&mut work, &snapshot.allocation[pid]);
        seen[pid] = true;
    }

    if sequence.len() == processes {
        Ok(())
    } else {
        Err(WitnessError::Incomplete {
            covered: sequence.len(),
            processes,
        })
    }
}
