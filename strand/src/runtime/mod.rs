//! Core runtime components.
//!
//! This module contains the building blocks of the lightweight execution
//! strategy: tasks, the work-stealing executor that runs them, and the
//! per-thread context that lets nested components find their runtime.
//!
//! Most users will interact with [`RuntimeBuilder`](builder::RuntimeBuilder),
//! [`task::spawn`] and [`task::JoinSet`] rather than with this module
//! directly.

mod core;
mod executor;
mod work_stealing;

pub(crate) mod builder;
pub(crate) mod context;

pub mod task;

pub use self::core::Runtime;
