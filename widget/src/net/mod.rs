//! Network side of the widget.
//!
//! DESIGN
//! ======
//! `transport` performs the HTTP exchange and nothing else. `adapter` owns
//! the policy: local match first, a single remote call on a miss, the hard
//! timeout, and classification of every result into an `Outcome`.

pub mod adapter;
pub mod transport;
