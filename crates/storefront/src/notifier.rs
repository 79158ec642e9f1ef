//! User-facing notifications.
//!
//! The storefront surfaces exactly one thing to the user outside of rendered
//! state: the confirmation after a successful checkout. Everything else goes
//! to the diagnostic log.

use std::future::Future;

/// Receives user-facing notifications from the [`Storefront`](crate::Storefront).
pub trait Notifier: Send + Sync {
    /// Called once after the backend accepted a checkout, before the cart is
    /// refetched. The returned future blocks the checkout flow until the user
    /// has acknowledged the confirmation.
    fn order_placed(&self) -> impl Future<Output = ()> + Send;
}

/// Notifier that only records the confirmation in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn order_placed(&self) {
        tracing::info!("Order placed successfully");
    }
}
