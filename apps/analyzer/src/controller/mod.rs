//! Controller layer: session state, events, the pure reducer, and command orchestration.

pub mod events;
pub mod orchestration;
pub mod reducer;
pub mod state;
