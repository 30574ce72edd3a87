#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use invoice_service::document::{DocumentRenderer, Node, RenderError};
use invoice_service::invoice::IssuerProfile;
use invoice_service::models::{Order, ShippingAddress};
use invoice_service::services::OrderRepository;
use invoice_service::startup::{router, AppState};
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const ORDER_ID: &str = "64fabc1234567890abcdef12";
pub const FAKE_PDF: &[u8] = b"%PDF-1.3 fake";

pub fn sample_order() -> Order {
    Order {
        id: ORDER_ID.to_string(),
        user_id: Some("64fa00000000000000000001".to_string()),
        product_id: Some("64fa00000000000000000002".to_string()),
        variant: None,
        quantity: Some(1.0),
        amount: 499.0,
        shipping_address: Some(ShippingAddress {
            full_name: Some("Asha Rao".to_string()),
            phone: Some("9999999999".to_string()),
            ..Default::default()
        }),
    }
}

/// In-memory order store that counts lookups.
#[derive(Default)]
pub struct FakeOrders {
    orders: HashMap<String, Order>,
    failing: bool,
    pub lookups: AtomicUsize,
}

impl FakeOrders {
    pub fn with(orders: Vec<Order>) -> Self {
        Self {
            orders: orders.into_iter().map(|o| (o.id.clone(), o)).collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderRepository for FakeOrders {
    async fn find_by_id(&self, id: &str) -> Result<Option<Order>, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "connection refused by mongo-0"
            )));
        }
        Ok(self.orders.get(id).cloned())
    }

    async fn ping(&self) -> Result<(), AppError> {
        if self.failing {
            Err(AppError::ServiceUnavailable)
        } else {
            Ok(())
        }
    }
}

/// Renderer that records the trees it receives.
#[derive(Default)]
pub struct FakeRenderer {
    failing: bool,
    pub trees: Mutex<Vec<Node>>,
}

impl FakeRenderer {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn render_count(&self) -> usize {
        self.trees.lock().unwrap().len()
    }

    pub fn last_tree(&self) -> Node {
        self.trees.lock().unwrap().last().cloned().expect("no render call")
    }
}

#[async_trait]
impl DocumentRenderer for FakeRenderer {
    async fn render(&self, tree: &Node) -> Result<Vec<u8>, RenderError> {
        self.trees.lock().unwrap().push(tree.clone());
        if self.failing {
            return Err(RenderError::ImageFetch {
                url: "https://cdn.internal/logo.png".to_string(),
                reason: "secret upstream detail".to_string(),
            });
        }
        Ok(FAKE_PDF.to_vec())
    }
}

pub struct TestApp {
    pub router: Router,
    pub orders: Arc<FakeOrders>,
    pub renderer: Arc<FakeRenderer>,
}

impl TestApp {
    pub fn new(orders: FakeOrders, renderer: FakeRenderer) -> Self {
        let orders = Arc::new(orders);
        let renderer = Arc::new(renderer);
        let state = AppState {
            orders: orders.clone(),
            renderer: renderer.clone(),
            issuer: IssuerProfile::vevvion(),
        };

        Self {
            router: router(state),
            orders,
            renderer,
        }
    }

    pub fn with_sample_order() -> Self {
        Self::new(FakeOrders::with(vec![sample_order()]), FakeRenderer::default())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        (status, headers, body.to_vec())
    }
}
