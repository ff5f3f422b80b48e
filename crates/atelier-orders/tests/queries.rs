//! Reading orders back: single lookups, ownership and paged lists.

mod common;

use atelier_core::{OrderItemRequest, OrderStatus, StaffRole};
use atelier_orders::{OrderError, Page};
use common::Shop;

#[tokio::test]
async fn test_get_order_is_stable() {
    let shop = Shop::open().await;
    let client = shop.client("Ivanova", true).await;
    let ring = shop.product("RING-GD-001", 2_450_000, 5).await;

    let created = shop
        .service
        .create_order(
            &client.id,
            &[OrderItemRequest::new(&ring.id, 1)],
            Some("gift box"),
        )
        .await
        .unwrap();

    let first = shop.service.get_order(&created.id, None).await.unwrap();
    let second = shop.service.get_order(&created.id, None).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first, created);
    assert_eq!(first.client.full_name, "Ivanova Test");
}

#[tokio::test]
async fn test_get_order_checks_ownership() {
    let shop = Shop::open().await;
    let owner = shop.client("Sidorov", false).await;
    let stranger = shop.client("Kuznetsova", false).await;
    let ring = shop.product("RING-GD-001", 100_000, 5).await;

    let order = shop
        .service
        .create_order(&owner.id, &[OrderItemRequest::new(&ring.id, 1)], None)
        .await
        .unwrap();

    assert!(shop.service.get_order(&order.id, Some(&owner.id)).await.is_ok());

    let err = shop
        .service
        .get_order(&order.id, Some(&stranger.id))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::Unauthorized(_)));

    let err = shop.service.get_order("missing", None).await.unwrap_err();
    assert!(matches!(err, OrderError::NotFound { ref entity, .. } if entity == "Order"));
}

#[tokio::test]
async fn test_active_orders_and_history() {
    let shop = Shop::open().await;
    let client = shop.client("Sidorov", false).await;
    let other = shop.client("Petrova", false).await;
    let ring = shop.product("RING-GD-001", 100_000, 50).await;

    let mut ids = Vec::new();
    for qty in 1..=4 {
        let order = shop
            .service
            .create_order(&client.id, &[OrderItemRequest::new(&ring.id, qty)], None)
            .await
            .unwrap();
        ids.push(order.id);
    }
    shop.service
        .create_order(&other.id, &[OrderItemRequest::new(&ring.id, 1)], None)
        .await
        .unwrap();

    shop.service.cancel_order(&ids[1], &client.id).await.unwrap();

    let active = shop
        .service
        .list_active_orders(&client.id, Page::default())
        .await
        .unwrap();
    assert_eq!(active.total, 3);
    let active_ids: Vec<&str> = active.items.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(active_ids, vec![ids[3].as_str(), ids[2].as_str(), ids[0].as_str()]);
    assert!(active.items.iter().all(|o| o.status != OrderStatus::Cancelled));

    let history = shop
        .service
        .order_history(&client.id, Page::default())
        .await
        .unwrap();
    assert_eq!(history.total, 4);
    assert_eq!(history.items[0].id, ids[3]);
    assert!(history.items.iter().all(|o| o.client.id == client.id));
    assert_eq!(history.items[3].items[0].quantity, 1);
}

#[tokio::test]
async fn test_paging() {
    let shop = Shop::open().await;
    let client = shop.client("Sidorov", false).await;
    let ring = shop.product("RING-GD-001", 100_000, 50).await;

    for _ in 0..5 {
        shop.service
            .create_order(&client.id, &[OrderItemRequest::new(&ring.id, 1)], None)
            .await
            .unwrap();
    }

    let page = Page::first(2);
    let first = shop.service.order_history(&client.id, page).await.unwrap();
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.total, 5);
    assert_eq!(first.total_pages(), 3);
    assert!(first.has_next());

    let last = shop
        .service
        .order_history(&client.id, page.next().next())
        .await
        .unwrap();
    assert_eq!(last.items.len(), 1);
    assert!(!last.has_next());

    let beyond = shop
        .service
        .order_history(&client.id, Page::new(10, 2))
        .await
        .unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 5);
}

#[tokio::test]
async fn test_list_all_orders_spans_clients() {
    let shop = Shop::open().await;
    let a = shop.client("Sidorov", false).await;
    let b = shop.client("Ivanova", true).await;
    let ring = shop.product("RING-GD-001", 100_000, 50).await;
    let _admin = shop.staff(StaffRole::Admin).await;

    for client in [&a, &b, &a] {
        shop.service
            .create_order(&client.id, &[OrderItemRequest::new(&ring.id, 1)], None)
            .await
            .unwrap();
    }

    let all = shop.service.list_all_orders(Page::default()).await.unwrap();
    assert_eq!(all.total, 3);
    assert_eq!(all.items.len(), 3);
    assert_eq!(all.items[0].client.id, a.id);
    assert_eq!(all.items[1].client.id, b.id);
    assert!(all.items[1].client.is_permanent);
}

#[tokio::test]
async fn test_listing_unknown_client_is_not_found() {
    let shop = Shop::open().await;

    let err = shop
        .service
        .list_active_orders("nobody", Page::default())
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::NotFound { ref entity, .. } if entity == "Client"));
}

#[tokio::test]
async fn test_snapshot_json_for_clients() {
    let shop = Shop::open().await;
    let client = shop.client("Ivanova", true).await;
    let pendant = shop.product("PND-GD-007", 50_000, 5).await;

    let order = shop
        .service
        .create_order(&client.id, &[OrderItemRequest::new(&pendant.id, 2)], None)
        .await
        .unwrap();

    let json = serde_json::to_value(&order).unwrap();
    assert_eq!(json["status"], "PENDING");
    assert_eq!(json["subtotal"], 100_000);
    assert_eq!(json["discount"], 10_000);
    assert_eq!(json["finalAmount"], 90_000);
    assert_eq!(json["items"][0]["sku"], "PND-GD-007");
    assert_eq!(json["items"][0]["totalPrice"], 100_000);
}
