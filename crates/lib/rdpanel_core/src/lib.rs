//! # rdpanel_core
//!
//! Core domain logic for rdpanel.
//!
//! Holds the backend data models, the persisted session store, the notice and
//! navigation seams used by front-ends, and the cancellable polling primitive
//! that views refresh through.

pub mod config;
pub mod models;
pub mod navigation;
pub mod notify;
pub mod poll;
pub mod session;
pub mod storage;
