//! Policy validators, grouped by concern.
//!
//! Every public validator has the [`Validator`](crate::core::pipeline::Validator)
//! signature and is wired to a phase in [`crate::phases`].

pub mod context;
pub mod format;
pub mod git;
pub mod jax;
pub mod protection;
pub mod session;
