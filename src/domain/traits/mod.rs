//! Domain traits - Capabilities supplied by infrastructure implementations

pub mod clock;
pub mod detector;
pub mod dispatcher;
pub mod identity;

pub use clock::{Clock, ManualClock, SystemClock};
pub use detector::Detector;
pub use dispatcher::{OutgoingReply, ResponseDispatcher};
pub use identity::{resolve_identity, IdentityProvider};
