//! Infrastructure layer - transport adapters
//!
//! The dispatch core has no wire format of its own. This layer holds the
//! policy and adapters that expose outcomes over a network boundary.

pub mod http;
