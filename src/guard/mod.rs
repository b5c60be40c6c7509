//! Guards - the conditional mutation protocols layered over the entity store.
//!
//! - [`ConcurrencyGuard`]: optimistic-concurrency update. A zero-row
//!   conditional write becomes either [`UpdateOutcome::NotFound`] or
//!   [`UpdateOutcome::Conflict`] carrying the server's current record.
//! - [`DeletionGuard`]: referential-integrity delete. A department with
//!   courses yields [`DeleteOutcome::Blocked`] and nothing changes.
//!
//! Neither guard retries. Every non-success outcome needs a new decision
//! from the caller.

mod concurrency;
mod deletion;

pub use concurrency::{ConcurrencyGuard, UpdateOutcome};
pub use deletion::{DeleteOutcome, DeletionGuard};
