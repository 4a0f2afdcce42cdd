//! Cancel input implementations
//!
//! - Push button: active-low, latches once pressed
//! - Flag: shared atomic set from another context

pub mod button;
pub mod flag;

pub use button::ButtonCancel;
pub use flag::FlagCancel;
