//! Workflow orchestration: checkout, orders view, cancel/receive
//!
//! The controller sequences independent ledger calls; there is no server-side
//! transaction spanning the steps. The pending check before `create_order` is
//! a best-effort gate, with the server's partial unique index catching the
//! window between check and insert.

use shared::error::ErrorCode;
use shared::models::{Order, OrderDetails};

use crate::api::{OrderApi, Session};
use crate::error::ClientError;

/// Result of a checkout submission.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// No client-held session; the caller redirects to sign-in.
    SignInRequired,
    /// A pending order already exists; nothing was created.
    PendingOrderExists,
    /// The order was created; transition to the confirmation view.
    Confirmed(Order),
    /// The attempt failed; the user stays on the checkout view.
    Failed { message: String, retryable: bool },
}

/// Result of a cancel or receive action. Both re-fetch the view afterwards,
/// including when the order was already gone.
#[derive(Debug)]
pub enum MutateOutcome {
    /// The mutation applied; the refreshed view is attached.
    Done(OrdersView),
    /// The order no longer existed (double-click, second tab); the view was
    /// refreshed so the caller can drop the stale state.
    AlreadyGone(OrdersView),
    Failed { message: String, retryable: bool },
}

/// The orders screen: history and active order, fetched independently.
///
/// A failed section keeps its error without discarding the other section;
/// `active = None` with no error means "no active order", a normal state.
#[derive(Debug, Default)]
pub struct OrdersView {
    pub history: Vec<OrderDetails>,
    pub active: Option<OrderDetails>,
    pub history_error: Option<String>,
    pub active_error: Option<String>,
}

/// Client workflow controller over any [`OrderApi`] transport.
pub struct WorkflowController<A: OrderApi> {
    api: A,
}

impl<A: OrderApi> WorkflowController<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Submit a checkout: gate on the pending check, then create the order
    /// with the given timestamp and user-entered comment.
    pub async fn submit_checkout(
        &self,
        session: Option<&Session>,
        product_id: i64,
        time: i64,
        comments: &str,
    ) -> CheckoutOutcome {
        let Some(session) = session else {
            return CheckoutOutcome::SignInRequired;
        };

        match self.api.has_pending_orders(session).await {
            Ok(true) => return CheckoutOutcome::PendingOrderExists,
            Ok(false) => {}
            Err(e) => return failed(e),
        }

        match self.api.create_order(session, product_id, time, comments).await {
            Ok(order) => CheckoutOutcome::Confirmed(order),
            // Lost the check-then-create race; same user-visible outcome as
            // the gate firing.
            Err(ClientError::Api {
                code: ErrorCode::ActiveOrderExists,
                ..
            }) => CheckoutOutcome::PendingOrderExists,
            Err(e) => failed(e),
        }
    }

    /// Load the orders screen. History and active order are fetched
    /// independently so one failing does not blank the other.
    pub async fn load_orders_view(&self, session: &Session) -> OrdersView {
        let mut view = OrdersView::default();

        match self.api.order_history(session).await {
            Ok(history) => view.history = history,
            Err(e) => {
                tracing::warn!("Order history fetch failed: {e}");
                view.history_error = Some(e.to_string());
            }
        }

        match self.api.active_order(session).await {
            Ok(active) => view.active = active,
            Err(e) => {
                tracing::warn!("Active order fetch failed: {e}");
                view.active_error = Some(e.to_string());
            }
        }

        view
    }

    /// Cancel the active order by id, then refresh the view.
    pub async fn cancel_active(&self, session: &Session, order_id: i64) -> MutateOutcome {
        match self.api.cancel_order(session, order_id).await {
            Ok(_) => MutateOutcome::Done(self.load_orders_view(session).await),
            Err(e) if e.is_not_found() => {
                MutateOutcome::AlreadyGone(self.load_orders_view(session).await)
            }
            Err(e) => mutate_failed(e),
        }
    }

    /// Mark the active order received, then refresh the view.
    pub async fn receive_active(&self, session: &Session, order_id: i64) -> MutateOutcome {
        match self.api.mark_received(session, order_id).await {
            Ok(()) => MutateOutcome::Done(self.load_orders_view(session).await),
            Err(e) if e.is_not_found() => {
                MutateOutcome::AlreadyGone(self.load_orders_view(session).await)
            }
            Err(e) => mutate_failed(e),
        }
    }
}

fn failed(e: ClientError) -> CheckoutOutcome {
    CheckoutOutcome::Failed {
        retryable: e.is_retryable(),
        message: e.to_string(),
    }
}

fn mutate_failed(e: ClientError) -> MutateOutcome {
    MutateOutcome::Failed {
        retryable: e.is_retryable(),
        message: e.to_string(),
    }
}
