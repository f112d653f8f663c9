//! Cart persistence flows: mutations written through to disk and read
//! back by later sessions.

use tiffin_core::ProductId;
use tiffin_integration_tests::{TestContext, fixture_catalog};

#[tokio::test]
async fn test_cart_written_through_to_disk() {
    let ctx = TestContext::new(fixture_catalog()).await;
    let catalog = ctx.state.catalog();
    let cart = ctx.state.cart();

    catalog.fetch_product(&ProductId::new("prod-1")).await;
    let product = catalog.snapshot().selected.clone().expect("product resolved");

    cart.add_to_cart(&product);
    cart.add_to_cart(&product);

    // The document hits disk on every mutation
    let raw = std::fs::read_to_string(ctx.cart_file()).expect("cart file exists");
    let doc: serde_json::Value = serde_json::from_str(&raw).expect("cart file is JSON");
    let lines = doc
        .get("cart")
        .and_then(serde_json::Value::as_array)
        .expect("document has a cart array");
    assert_eq!(lines.len(), 1);
    assert_eq!(
        lines
            .first()
            .and_then(|line| line.get("quantity"))
            .and_then(serde_json::Value::as_u64),
        Some(2)
    );
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let ctx = TestContext::new(fixture_catalog()).await;
    let catalog = ctx.state.catalog();
    let cart = ctx.state.cart();

    catalog.fetch_product(&ProductId::new("prod-2")).await;
    let product = catalog.snapshot().selected.clone().expect("product resolved");

    cart.add_to_cart(&product);
    cart.increment_quantity(&product.id);
    cart.increment_quantity(&product.id);

    let next_session = ctx.restart();
    let snapshot = next_session.cart().snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.total_items(), 3);
    assert_eq!(snapshot.subtotal(), "72.00".parse().expect("subtotal"));
}

#[tokio::test]
async fn test_corrupt_cart_file_degrades_to_empty() {
    let ctx = TestContext::new(fixture_catalog()).await;
    std::fs::write(ctx.cart_file(), "{not json").expect("write garbage");

    // A corrupt document costs the cart, never the session
    let session = ctx.restart();
    assert!(session.cart().snapshot().is_empty());

    // The next mutation writes a fresh valid document
    ctx.state
        .catalog()
        .fetch_product(&ProductId::new("prod-3"))
        .await;
    let product = ctx
        .state
        .catalog()
        .snapshot()
        .selected
        .clone()
        .expect("product resolved");
    session.cart().add_to_cart(&product);

    let raw = std::fs::read_to_string(ctx.cart_file()).expect("cart file exists");
    let doc: serde_json::Value = serde_json::from_str(&raw).expect("cart file is JSON again");
    assert_eq!(
        doc.get("cart")
            .and_then(serde_json::Value::as_array)
            .map(Vec::len),
        Some(1)
    );
}

#[tokio::test]
async fn test_shopping_flow_end_to_end() {
    let ctx = TestContext::new(fixture_catalog()).await;
    let catalog = ctx.state.catalog();
    let cart = ctx.state.cart();

    // Browse, narrow, pick
    catalog.fetch_products().await;
    catalog.toggle_brand("Amma's Kitchen");
    catalog.set_search("tiffin");

    let snapshot = catalog.snapshot();
    assert_eq!(snapshot.filtered.len(), 1);
    let pick = snapshot.filtered.first().expect("one match").clone();
    assert_eq!(pick.id.as_str(), "prod-1");

    // Buy two
    cart.add_to_cart(&pick);
    cart.increment_quantity(&pick.id);
    assert_eq!(cart.snapshot().total_items(), 2);
    assert_eq!(cart.snapshot().subtotal(), "17.00".parse().expect("subtotal"));

    // A later session sees the same cart without refetching the catalog
    let later = ctx.restart();
    assert_eq!(later.cart().snapshot().total_items(), 2);
    assert!(later.catalog().snapshot().products.is_empty());
}
