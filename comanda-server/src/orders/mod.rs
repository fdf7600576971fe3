//! Order domain: pricing and the lifecycle service
//!
//! [`OrderService`] is the single write path for orders. Handlers read
//! through the repositories directly, but every mutation (placement,
//! approval, rejection, cancellation, kitchen advance, feedback) goes
//! through the service so that validation, the conditional status
//! transition and the realtime broadcast always travel together.

pub mod money;
pub mod service;

pub use service::{OrderLine, OrderService, PlaceOrder, SubmitFeedback};
