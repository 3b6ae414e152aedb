#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Serialized access to one allocator from many tasks
//!
//! The allocator itself is a plain synchronous value. This crate moves it
//! into a dedicated tokio task that owns it exclusively and handles commands
//! one at a time, so concurrent callers can share it through cloned
//! [`AllocatorHandle`]s without ever observing a half-applied request.

mod actor;

pub use actor::{spawn, AllocatorHandle};
