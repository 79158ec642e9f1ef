//! Integration tests driving the terminal front end with scripted input.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::io::Cursor;
use std::sync::Arc;

use shop_integration_tests::{
    Endpoint, MockBackend, MockResponse, cart_json, product_json, product_page_json,
};
use shop_storefront::Storefront;
use shop_storefront::terminal::{self, Console, ConsoleNotifier};

/// Run a scripted session against the backend and return what was printed.
async fn session(backend: &MockBackend, script: &str) -> String {
    let console = Arc::new(Console::new(
        Cursor::new(script.as_bytes().to_vec()),
        Vec::new(),
    ));
    let storefront = Storefront::new(
        backend.config(),
        ConsoleNotifier::new(Arc::clone(&console)),
    );

    storefront.refresh().await;
    terminal::run(&storefront, &console).await.unwrap();

    drop(storefront);
    let output = Arc::try_unwrap(console).unwrap().into_output();
    String::from_utf8(output).unwrap()
}

fn stock_backend(backend: &MockBackend) {
    backend.respond(
        Endpoint::ListProducts,
        MockResponse::ok(&product_page_json(&[
            product_json(1, "Tea", 4.5),
            product_json(2, "Mug", 12.0),
        ])),
    );
}

#[tokio::test]
async fn test_session_shows_initial_views() {
    let backend = MockBackend::start().await.unwrap();
    stock_backend(&backend);

    let output = session(&backend, "quit\n").await;

    assert!(output.contains("Products\n  [1] Tea - 4.50\n"));
    assert!(output.contains("  [2] Mug - 12.00\n"));
    assert!(output.contains("Cart\n  Your cart is empty\n"));
}

#[tokio::test]
async fn test_session_add_and_checkout() {
    let backend = MockBackend::start().await.unwrap();
    stock_backend(&backend);
    backend.respond_sequence(
        Endpoint::GetCart,
        [
            MockResponse::ok(&cart_json(&[])),
            MockResponse::ok(&cart_json(&[(10, 1, 1)])),
            MockResponse::ok(&cart_json(&[])),
        ],
    );

    // The empty line acknowledges the order confirmation
    let output = session(&backend, "add 1\ncheckout\n\nquit\n").await;

    let lines = backend.journal_lines();
    assert_eq!(
        &lines[2..],
        [
            "POST /cart/1/items",
            "GET /cart/1",
            "POST /orders/from-cart/1",
            "GET /cart/1",
        ]
    );
    assert!(output.contains("Cart (1 item)\n  #10 Product #1 Tea - Qty: 1 (4.50)\n"));
    assert_eq!(output.matches("Order placed successfully!").count(), 1);
    assert!(output.ends_with("Cart\n  Your cart is empty\n> "));
}

#[tokio::test]
async fn test_session_reports_bad_commands_and_continues() {
    let backend = MockBackend::start().await.unwrap();

    let output = session(&backend, "buy 1\nadd tea\nadd\n").await;

    assert!(output.contains("unknown command: buy"));
    assert!(output.contains("invalid ProductId: \"tea\""));
    assert!(output.contains("'add' needs an id"));
    // Only the initial loads reached the backend
    assert_eq!(backend.requests().len(), 2);
}

#[tokio::test]
async fn test_session_ends_at_end_of_input() {
    let backend = MockBackend::start().await.unwrap();

    let output = session(&backend, "cart\n").await;

    assert_eq!(output.matches("Your cart is empty").count(), 2);
}
