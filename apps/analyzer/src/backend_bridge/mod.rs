//! Backend side of the session: commands emitted by the reducer and the
//! runtime that executes them off the event loop.

pub mod commands;
pub mod runtime;
