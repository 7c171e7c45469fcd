//! Guided workout session runner.
//!
//! Drives one workout from start to finish: tracks the active exercise,
//! per-set completion, rest countdowns between exercises, and produces a
//! finalized [`WorkoutLog`] when the plan is exhausted.
//!
//! The runner holds no timers and performs no I/O. It is a pure state
//! machine: user actions and an externally scheduled one-second pulse
//! ([`SessionRunner::tick`]) are the only inputs. All operations are
//! synchronous and run to completion, so a single mutator needs no locking.

use crate::{Error, Exercise, ExerciseLog, Result, SetLog, WorkoutLog, WorkoutPlan};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// Monotonic time source injected into the runner
///
/// Production code uses [`SystemClock`]; tests drive a manual clock so
/// elapsed-duration assertions are exact.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time via `chrono`
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Session runner state
///
/// The exercise index carried by `Active` and `Resting` only ever
/// increases. `Finished` and `Cancelled` are terminal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Working through the exercise at this index
    Active { exercise: usize },
    /// Rest countdown after completing the exercise at this index
    Resting { exercise: usize, remaining: u32 },
    /// Plan exhausted; a log has been produced exactly once
    Finished,
    /// Aborted while on the exercise at this index; no log
    Cancelled { exercise: usize },
}

/// Drives one guided workout session over an immutable plan
///
/// Constructed with [`SessionRunner::start`]. The plan is never mutated;
/// the per-set completion map is sized once at creation and never resized.
pub struct SessionRunner<C: Clock = SystemClock> {
    plan: WorkoutPlan,
    clock: C,
    rest_duration: u32,
    started_at: DateTime<Utc>,
    phase: Phase,
    completion: HashMap<String, Vec<bool>>,
    log: Option<WorkoutLog>,
}

impl SessionRunner<SystemClock> {
    /// Start a session against the system clock
    ///
    /// `rest_duration` is the caller-supplied rest countdown in seconds
    /// (typically `AppSettings::default_rest_time`).
    ///
    /// Fails with [`Error::InvalidPlan`] if the plan has no exercises.
    pub fn start(plan: WorkoutPlan, rest_duration: u32) -> Result<Self> {
        Self::start_with_clock(plan, rest_duration, SystemClock)
    }
}

impl<C: Clock> SessionRunner<C> {
    /// Start a session with an explicit clock
    pub fn start_with_clock(plan: WorkoutPlan, rest_duration: u32, clock: C) -> Result<Self> {
        if plan.exercises.is_empty() {
            return Err(Error::InvalidPlan("plan has no exercises".into()));
        }

        let completion = plan
            .exercises
            .iter()
            .map(|ex| (ex.id.clone(), vec![false; ex.sets as usize]))
            .collect();

        let started_at = clock.now();
        let mut runner = Self {
            plan,
            clock,
            rest_duration,
            started_at,
            phase: Phase::Active { exercise: 0 },
            completion,
            log: None,
        };

        tracing::info!(
            plan = %runner.plan.name,
            exercises = runner.plan.exercises.len(),
            "Session started"
        );

        // A zero-set opening exercise is vacuously complete and rests
        // immediately, without any toggle.
        runner.enter_exercise(0);
        Ok(runner)
    }

    /// Flip the completion flag for one set of the active exercise
    ///
    /// A toggle for a non-active exercise, or any toggle outside the
    /// `Active` phase, is ignored silently: the UI never exposes controls
    /// for inactive exercises, so such a call is a stale control rather
    /// than a state transition. An out-of-range set index within the
    /// active exercise is a real caller bug and is rejected.
    ///
    /// Entering the all-complete state (every set true after the flip,
    /// not before it) transitions into the rest phase.
    pub fn toggle_set(&mut self, exercise_id: &str, set_index: usize) -> Result<()> {
        let active = match self.phase {
            Phase::Active { exercise } => exercise,
            _ => {
                tracing::debug!(exercise_id, "Ignoring toggle outside active phase");
                return Ok(());
            }
        };

        if self.plan.exercises[active].id != exercise_id {
            tracing::debug!(exercise_id, "Ignoring toggle for non-active exercise");
            return Ok(());
        }

        let sets = self
            .completion
            .get_mut(exercise_id)
            .ok_or_else(|| Error::Session(format!("no completion entry for {exercise_id}")))?;

        if set_index >= sets.len() {
            return Err(Error::Session(format!(
                "set index {set_index} out of range for {} sets",
                sets.len()
            )));
        }

        let was_all_done = sets.iter().all(|done| *done);
        sets[set_index] = !sets[set_index];
        let all_done = sets.iter().all(|done| *done);

        // Rest triggers only on the transition into all-complete, not on
        // every check while already complete.
        if all_done && !was_all_done {
            self.begin_rest(active);
        }

        Ok(())
    }

    /// One-second pulse from the external clock source
    ///
    /// Only has an effect while resting: decrements the countdown and, at
    /// zero, exits the rest phase and advances to the next exercise (or
    /// finalizes after the last one).
    pub fn tick(&mut self) {
        if let Phase::Resting { exercise, remaining } = self.phase {
            if remaining <= 1 {
                self.advance_from(exercise);
            } else {
                self.phase = Phase::Resting {
                    exercise,
                    remaining: remaining - 1,
                };
            }
        }
    }

    /// Cut the rest countdown short and advance immediately
    ///
    /// No-op outside the resting phase; in particular it never advances
    /// the exercise index while `Active`.
    pub fn skip_rest(&mut self) {
        if let Phase::Resting { exercise, .. } = self.phase {
            tracing::debug!(exercise, "Rest skipped");
            self.advance_from(exercise);
        }
    }

    /// Terminate the session without producing a log
    ///
    /// Valid from any non-terminal state; no-op once finished or
    /// cancelled.
    pub fn cancel(&mut self) {
        match self.phase {
            Phase::Active { exercise } | Phase::Resting { exercise, .. } => {
                tracing::info!(plan = %self.plan.name, exercise, "Session cancelled");
                self.phase = Phase::Cancelled { exercise };
            }
            Phase::Finished | Phase::Cancelled { .. } => {}
        }
    }

    /// Whether the plan has been exhausted and a log produced
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    /// Whether the session was aborted
    pub fn is_cancelled(&self) -> bool {
        matches!(self.phase, Phase::Cancelled { .. })
    }

    /// Move the finalized log out of the runner
    ///
    /// The log is built exactly once, inside the transition that reaches
    /// `Finished`; taking it is the only way to observe it, so repeated
    /// `is_finished()` queries can never re-emit.
    pub fn take_log(&mut self) -> Option<WorkoutLog> {
        self.log.take()
    }

    /// Current session phase
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The plan this session runs over
    pub fn plan(&self) -> &WorkoutPlan {
        &self.plan
    }

    /// Timestamp captured once at session creation
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Index of the exercise in progress
    ///
    /// Equals the exercise count once finished, which is how callers
    /// detect completion. A cancelled session keeps the index it held at
    /// cancel time, so cancellation never reads as completion.
    pub fn current_exercise_index(&self) -> usize {
        match self.phase {
            Phase::Active { exercise }
            | Phase::Resting { exercise, .. }
            | Phase::Cancelled { exercise } => exercise,
            Phase::Finished => self.plan.exercises.len(),
        }
    }

    /// The exercise currently being worked or rested after, if any
    pub fn current_exercise(&self) -> Option<&Exercise> {
        match self.phase {
            Phase::Active { exercise } | Phase::Resting { exercise, .. } => {
                self.plan.exercises.get(exercise)
            }
            _ => None,
        }
    }

    /// The exercise coming up after the current rest, if any
    pub fn next_exercise(&self) -> Option<&Exercise> {
        match self.phase {
            Phase::Resting { exercise, .. } => self.plan.exercises.get(exercise + 1),
            _ => None,
        }
    }

    /// Seconds left on the rest countdown, if resting
    pub fn remaining_rest(&self) -> Option<u32> {
        match self.phase {
            Phase::Resting { remaining, .. } => Some(remaining),
            _ => None,
        }
    }

    /// Per-set completion flags for an exercise
    pub fn set_completion(&self, exercise_id: &str) -> Option<&[bool]> {
        self.completion.get(exercise_id).map(Vec::as_slice)
    }

    /// Make the exercise at `index` the active one
    ///
    /// An exercise with a zero target set count is treated as immediately
    /// all-complete and goes straight to rest.
    fn enter_exercise(&mut self, index: usize) {
        self.phase = Phase::Active { exercise: index };

        let vacuously_done = self.plan.exercises[index].sets == 0;
        if vacuously_done {
            tracing::debug!(index, "Exercise has no target sets, resting immediately");
            self.begin_rest(index);
        }
    }

    /// Enter the rest phase after the exercise at `index`
    ///
    /// A configured rest of zero seconds elides the phase entirely, since
    /// a countdown at zero could never be ticked down.
    fn begin_rest(&mut self, index: usize) {
        if self.rest_duration == 0 {
            self.advance_from(index);
        } else {
            self.phase = Phase::Resting {
                exercise: index,
                remaining: self.rest_duration,
            };
        }
    }

    /// Advance past the exercise at `index`, finalizing after the last one
    ///
    /// Rest is entered after the final exercise too; its expiry lands here
    /// and finalizes the session instead of advancing.
    fn advance_from(&mut self, index: usize) {
        let next = index + 1;
        if next >= self.plan.exercises.len() {
            self.finalize();
        } else {
            self.enter_exercise(next);
        }
    }

    /// Build the log and reach the terminal `Finished` state
    ///
    /// Level-triggered from the advancing transition itself; unreachable
    /// twice because every path here leaves a terminal phase behind.
    fn finalize(&mut self) {
        let now = self.clock.now();
        let elapsed_ms = (now - self.started_at).num_milliseconds().max(0);
        let duration = ((elapsed_ms as f64) / 1000.0).round() as u64;

        let exercises = self
            .plan
            .exercises
            .iter()
            .map(|ex| ExerciseLog {
                exercise_id: ex.id.clone(),
                exercise_name: ex.name.clone(),
                sets: self
                    .completion
                    .get(&ex.id)
                    .map(|sets| {
                        sets.iter()
                            .enumerate()
                            .map(|(i, completed)| SetLog {
                                set_number: i as u32 + 1,
                                completed: *completed,
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();

        self.log = Some(WorkoutLog {
            id: Uuid::new_v4(),
            plan_id: self.plan.id.clone(),
            plan_name: self.plan.name.clone(),
            date: now,
            duration,
            exercises,
            notes: None,
            rating: None,
        });
        self.phase = Phase::Finished;

        tracing::info!(plan = %self.plan.name, duration, "Session finished");
    }
}
