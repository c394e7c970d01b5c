//! Expiry timers implementing [`photodrop_core::ExpiryTimer`].
//!
//! `TokioTimer` is the production timer. `ManualTimer` is a virtual clock that only
//! moves when told to, so time-bounded state can be tested without sleeping.

pub mod manual;
pub mod timer;

pub use manual::ManualTimer;
pub use timer::TokioTimer;
