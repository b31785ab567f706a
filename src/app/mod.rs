//! Application state and screen flow

pub mod screen;
pub mod state;

pub use screen::{AppCoordinator, Screen, SetupOption};
pub use state::{App, Direction, DEFAULT_THINK_DELAY};
