#![forbid(unsafe_code)]

//! Core: pixel geometry and host pointer events.

pub mod event;
pub mod geometry;
