//! Workflow controller integration tests
//!
//! Drives the checkout/orders-view/cancel/receive orchestration against an
//! in-memory backend that mirrors the server's ledger semantics, including
//! the one-active-order-per-user constraint and its 409 on conflicting
//! inserts.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use comanda_client::{
    CheckoutOutcome, ClientError, ClientResult, MutateOutcome, OrderApi, Session,
    WorkflowController,
};
use rust_decimal::Decimal;
use shared::error::ErrorCode;
use shared::models::{Order, OrderDetails, Product, ProductInfo, Profile};

struct UserRec {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
}

#[derive(Default)]
struct LedgerState {
    users: Vec<UserRec>,
    next_user_id: i64,
    products: Vec<Product>,
    orders: Vec<Order>,
    next_order_id: i64,
}

/// In-memory stand-in for comanda-server.
#[derive(Default)]
struct InMemoryBackend {
    state: Mutex<LedgerState>,
    create_calls: AtomicUsize,
    /// When set, the next pending check reports false regardless of state,
    /// simulating the check-then-create race window.
    lie_on_next_pending_check: AtomicBool,
    fail_history: AtomicBool,
    fail_active: AtomicBool,
    fail_pending: AtomicBool,
}

fn api_err(code: ErrorCode) -> ClientError {
    ClientError::Api {
        status: code.http_status().as_u16(),
        message: code.message().to_string(),
        code,
    }
}

fn details(order: &Order, product: &Product) -> OrderDetails {
    OrderDetails {
        id: order.id,
        user_id: order.user_id,
        product_id: order.product_id,
        order_time: order.order_time,
        comments: order.comments.clone(),
        active: order.active,
        received_at: order.received_at,
        name: product.name.clone(),
        description: product.description.clone(),
        image: product.image.clone(),
        price: product.price,
        time: product.time.clone(),
    }
}

impl InMemoryBackend {
    fn with_products(products: Vec<Product>) -> Self {
        let backend = Self::default();
        backend.state.lock().unwrap().products = products;
        backend
    }

    fn order_count(&self) -> usize {
        self.state.lock().unwrap().orders.len()
    }
}

#[async_trait]
impl OrderApi for InMemoryBackend {
    async fn sign_up(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> ClientResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.email == email) {
            return Err(api_err(ErrorCode::EmailExists));
        }
        state.next_user_id += 1;
        let id = state.next_user_id;
        state.users.push(UserRec {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password.into(),
        });
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> ClientResult<Session> {
        let state = self.state.lock().unwrap();
        state
            .users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .map(|u| Session {
                user_id: u.id,
                token: format!("token-{}", u.id),
            })
            .ok_or_else(|| api_err(ErrorCode::InvalidCredentials))
    }

    async fn list_products(&self) -> ClientResult<Vec<Product>> {
        Ok(self.state.lock().unwrap().products.clone())
    }

    async fn get_product(&self, product_id: i64) -> ClientResult<ProductInfo> {
        let state = self.state.lock().unwrap();
        state
            .products
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| ProductInfo {
                name: p.name.clone(),
                description: p.description.clone(),
                image: p.image.clone(),
                price: p.price,
                available: p.available,
                time: p.time.clone(),
            })
            .ok_or_else(|| api_err(ErrorCode::ProductNotFound))
    }

    async fn get_profile(&self, session: &Session) -> ClientResult<Profile> {
        let state = self.state.lock().unwrap();
        state
            .users
            .iter()
            .find(|u| u.id == session.user_id)
            .map(|u| Profile {
                firstname: u.first_name.clone(),
                lastname: u.last_name.clone(),
                email: u.email.clone(),
            })
            .ok_or_else(|| api_err(ErrorCode::UserNotFound))
    }

    async fn has_pending_orders(&self, session: &Session) -> ClientResult<bool> {
        if self.fail_pending.load(Ordering::SeqCst) {
            return Err(ClientError::Timeout);
        }
        if self.lie_on_next_pending_check.swap(false, Ordering::SeqCst) {
            return Ok(false);
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .orders
            .iter()
            .any(|o| o.user_id == session.user_id && o.active))
    }

    async fn create_order(
        &self,
        session: &Session,
        product_id: i64,
        time: i64,
        comments: &str,
    ) -> ClientResult<Order> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        // The partial unique index: conflicting inserts lose with a 409
        if state
            .orders
            .iter()
            .any(|o| o.user_id == session.user_id && o.active)
        {
            return Err(api_err(ErrorCode::ActiveOrderExists));
        }
        state.next_order_id += 1;
        let order = Order {
            id: state.next_order_id,
            user_id: session.user_id,
            product_id,
            order_time: time,
            comments: comments.into(),
            active: true,
            received_at: None,
        };
        state.orders.push(order.clone());
        Ok(order)
    }

    async fn order_history(&self, session: &Session) -> ClientResult<Vec<OrderDetails>> {
        if self.fail_history.load(Ordering::SeqCst) {
            return Err(ClientError::Timeout);
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .orders
            .iter()
            .filter(|o| o.user_id == session.user_id)
            .map(|o| {
                let product = state
                    .products
                    .iter()
                    .find(|p| p.id == o.product_id)
                    .expect("order references a seeded product");
                details(o, product)
            })
            .collect())
    }

    async fn active_order(&self, session: &Session) -> ClientResult<Option<OrderDetails>> {
        if self.fail_active.load(Ordering::SeqCst) {
            return Err(ClientError::Timeout);
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .orders
            .iter()
            .find(|o| o.user_id == session.user_id && o.active)
            .map(|o| {
                let product = state
                    .products
                    .iter()
                    .find(|p| p.id == o.product_id)
                    .expect("order references a seeded product");
                details(o, product)
            }))
    }

    async fn cancel_order(&self, _session: &Session, order_id: i64) -> ClientResult<Order> {
        let mut state = self.state.lock().unwrap();
        let idx = state
            .orders
            .iter()
            .position(|o| o.id == order_id)
            .ok_or_else(|| api_err(ErrorCode::OrderNotFound))?;
        Ok(state.orders.remove(idx))
    }

    async fn mark_received(&self, _session: &Session, order_id: i64) -> ClientResult<()> {
        let mut state = self.state.lock().unwrap();
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| api_err(ErrorCode::OrderNotFound))?;
        order.active = false;
        order.received_at.get_or_insert(9_999);
        Ok(())
    }
}

fn seeded_products() -> Vec<Product> {
    vec![
        Product {
            id: 1,
            name: "Paella Valenciana".into(),
            description: "Saffron rice".into(),
            image: "/images/paella.jpg".into(),
            price: Decimal::new(1450, 2),
            available: 5,
            time: "25-30 min".into(),
        },
        Product {
            id: 2,
            name: "Gazpacho".into(),
            description: "Chilled tomato soup".into(),
            image: "/images/gazpacho.jpg".into(),
            price: Decimal::new(650, 2),
            available: 0,
            time: "5 min".into(),
        },
    ]
}

async fn signed_in_controller() -> (WorkflowController<InMemoryBackend>, Session) {
    let backend = InMemoryBackend::with_products(seeded_products());
    backend
        .sign_up("Ana", "Lopez", "ana@example.com", "secret-pw")
        .await
        .unwrap();
    let session = backend.sign_in("ana@example.com", "secret-pw").await.unwrap();
    (WorkflowController::new(backend), session)
}

#[tokio::test]
async fn sign_up_then_sign_in_round_trip() {
    let backend = InMemoryBackend::with_products(vec![]);
    backend
        .sign_up("Ana", "Lopez", "ana@example.com", "secret-pw")
        .await
        .unwrap();

    let session = backend.sign_in("ana@example.com", "secret-pw").await.unwrap();
    assert_eq!(session.user_id, 1);

    let profile = backend.get_profile(&session).await.unwrap();
    assert_eq!(profile.firstname, "Ana");
    assert_eq!(profile.email, "ana@example.com");

    // Mismatch is a 401, not a transport failure
    let err = backend
        .sign_in("ana@example.com", "wrong")
        .await
        .unwrap_err();
    match err {
        ClientError::Api { code, status, .. } => {
            assert_eq!(code, ErrorCode::InvalidCredentials);
            assert_eq!(status, 401);
        }
        other => panic!("expected Api error, got {other:?}"),
    }

    // Duplicate email is a conflict
    let err = backend
        .sign_up("Ana", "Lopez", "ana@example.com", "again")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Api {
            code: ErrorCode::EmailExists,
            status: 409,
            ..
        }
    ));
}

#[tokio::test]
async fn checkout_requires_a_session() {
    let (controller, _session) = signed_in_controller().await;

    let outcome = controller.submit_checkout(None, 1, 100, "").await;
    assert!(matches!(outcome, CheckoutOutcome::SignInRequired));
    assert_eq!(controller.api().create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn checkout_gate_enforces_single_active_order() {
    let (controller, session) = signed_in_controller().await;

    assert!(!controller.api().has_pending_orders(&session).await.unwrap());

    // First checkout goes through
    let outcome = controller
        .submit_checkout(Some(&session), 1, 1_000, "extra lemon")
        .await;
    let first = match outcome {
        CheckoutOutcome::Confirmed(order) => order,
        other => panic!("expected Confirmed, got {other:?}"),
    };
    assert_eq!(first.user_id, session.user_id);
    assert_eq!(first.product_id, 1);
    assert!(first.active);

    let active = controller.api().active_order(&session).await.unwrap().unwrap();
    assert_eq!(active.id, first.id);
    assert_eq!(active.product_id, 1);

    // Second checkout is stopped by the gate; create_order is never called
    let outcome = controller
        .submit_checkout(Some(&session), 2, 2_000, "")
        .await;
    assert!(matches!(outcome, CheckoutOutcome::PendingOrderExists));
    assert_eq!(controller.api().create_calls.load(Ordering::SeqCst), 1);
    assert_eq!(controller.api().order_count(), 1);

    // Cancel frees the slot
    let outcome = controller.cancel_active(&session, first.id).await;
    let view = match outcome {
        MutateOutcome::Done(view) => view,
        other => panic!("expected Done, got {other:?}"),
    };
    assert!(view.active.is_none());
    assert!(view.active_error.is_none());
    assert!(!controller.api().has_pending_orders(&session).await.unwrap());

    // And a new checkout succeeds
    let outcome = controller
        .submit_checkout(Some(&session), 2, 3_000, "")
        .await;
    assert!(matches!(outcome, CheckoutOutcome::Confirmed(_)));
}

#[tokio::test]
async fn losing_the_create_race_reads_as_pending() {
    let (controller, session) = signed_in_controller().await;

    let outcome = controller
        .submit_checkout(Some(&session), 1, 1_000, "")
        .await;
    assert!(matches!(outcome, CheckoutOutcome::Confirmed(_)));

    // Gate claims no pending order, insert hits the unique constraint
    controller
        .api()
        .lie_on_next_pending_check
        .store(true, Ordering::SeqCst);
    let outcome = controller
        .submit_checkout(Some(&session), 2, 2_000, "")
        .await;
    assert!(matches!(outcome, CheckoutOutcome::PendingOrderExists));
    assert_eq!(controller.api().order_count(), 1);
}

#[tokio::test]
async fn receive_keeps_history_row_inactive() {
    let (controller, session) = signed_in_controller().await;

    let order = match controller
        .submit_checkout(Some(&session), 1, 1_000, "ring the bell")
        .await
    {
        CheckoutOutcome::Confirmed(order) => order,
        other => panic!("expected Confirmed, got {other:?}"),
    };

    let view = match controller.receive_active(&session, order.id).await {
        MutateOutcome::Done(view) => view,
        other => panic!("expected Done, got {other:?}"),
    };

    assert!(view.active.is_none());
    assert_eq!(view.history.len(), 1);
    assert!(!view.history[0].active);
    assert!(view.history[0].received_at.is_some());
    assert_eq!(view.history[0].comments, "ring the bell");
}

#[tokio::test]
async fn cancel_is_idempotent_from_the_controller() {
    let (controller, session) = signed_in_controller().await;

    let order = match controller
        .submit_checkout(Some(&session), 1, 1_000, "")
        .await
    {
        CheckoutOutcome::Confirmed(order) => order,
        other => panic!("expected Confirmed, got {other:?}"),
    };

    assert!(matches!(
        controller.cancel_active(&session, order.id).await,
        MutateOutcome::Done(_)
    ));

    // Second cancel of the same id reports staleness, not a crash
    let outcome = controller.cancel_active(&session, order.id).await;
    let view = match outcome {
        MutateOutcome::AlreadyGone(view) => view,
        other => panic!("expected AlreadyGone, got {other:?}"),
    };
    assert!(view.active.is_none());
    assert!(view.history.is_empty());

    // Receiving a canceled order is stale in the same way
    assert!(matches!(
        controller.receive_active(&session, order.id).await,
        MutateOutcome::AlreadyGone(_)
    ));
}

#[tokio::test]
async fn cancel_unknown_id_leaves_other_rows_unchanged() {
    let (controller, session) = signed_in_controller().await;

    let order = match controller
        .submit_checkout(Some(&session), 1, 1_000, "")
        .await
    {
        CheckoutOutcome::Confirmed(order) => order,
        other => panic!("expected Confirmed, got {other:?}"),
    };

    let err = controller
        .api()
        .cancel_order(&session, 999)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    // The existing order is untouched
    let active = controller.api().active_order(&session).await.unwrap().unwrap();
    assert_eq!(active.id, order.id);
    assert_eq!(controller.api().order_count(), 1);
}

#[tokio::test]
async fn partial_failures_keep_the_other_section() {
    let (controller, session) = signed_in_controller().await;

    let outcome = controller
        .submit_checkout(Some(&session), 1, 1_000, "")
        .await;
    assert!(matches!(outcome, CheckoutOutcome::Confirmed(_)));

    // History down, active still renders
    controller.api().fail_history.store(true, Ordering::SeqCst);
    let view = controller.load_orders_view(&session).await;
    assert!(view.history_error.is_some());
    assert!(view.history.is_empty());
    assert!(view.active.is_some());
    controller.api().fail_history.store(false, Ordering::SeqCst);

    // Active down, history still renders
    controller.api().fail_active.store(true, Ordering::SeqCst);
    let view = controller.load_orders_view(&session).await;
    assert!(view.active_error.is_some());
    assert!(view.active.is_none());
    assert_eq!(view.history.len(), 1);
}

#[tokio::test]
async fn transport_failure_during_gate_is_retryable() {
    let (controller, session) = signed_in_controller().await;

    controller.api().fail_pending.store(true, Ordering::SeqCst);
    let outcome = controller
        .submit_checkout(Some(&session), 1, 1_000, "")
        .await;
    match outcome {
        CheckoutOutcome::Failed { retryable, .. } => assert!(retryable),
        other => panic!("expected Failed, got {other:?}"),
    }
    // Nothing was created while the gate was unreachable
    assert_eq!(controller.api().order_count(), 0);
}

#[tokio::test]
async fn unavailable_product_is_still_fetchable() {
    let (controller, _session) = signed_in_controller().await;

    // Gazpacho is seeded with available = 0
    let product = controller.api().get_product(2).await.unwrap();
    assert_eq!(product.available, 0);
    assert_eq!(product.name, "Gazpacho");
}

#[tokio::test]
async fn no_active_order_is_a_normal_view_state() {
    let (controller, session) = signed_in_controller().await;

    let view = controller.load_orders_view(&session).await;
    assert!(view.active.is_none());
    assert!(view.active_error.is_none());
    assert!(view.history.is_empty());
    assert!(view.history_error.is_none());
}
