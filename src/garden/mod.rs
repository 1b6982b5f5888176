//! Garden module - entities, state and per-frame physics.

mod feedback;
mod flower;
mod input;
mod physics;
mod rng;
mod session;
mod state;
mod stem;

pub use feedback::*;
pub use flower::*;
pub use input::*;
pub use physics::*;
pub use rng::*;
pub use session::*;
pub use state::*;
pub use stem::*;
