pub mod hit;
pub mod node;
pub mod physics;
pub mod session;
pub mod stage;
pub mod timers;
pub mod viewport;

pub use session::{InfoPanel, Session, SessionEvent, Timings};
pub use stage::{Belief, Side, Stage};
