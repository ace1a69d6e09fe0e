//! In-process event distribution for Carelink.
//!
//! The API layer publishes a [`LifecycleEvent`] after every committed
//! state change; notification, chat, and wallet collaborators
//! subscribe to react. The bus is owned state constructed per process
//! and shared via `Arc` — never a module-level global — so tests can
//! build and tear one down deterministically.

pub mod bus;

pub use bus::{event_types, EventBus, LifecycleEvent};
