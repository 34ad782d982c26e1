use std::{net::SocketAddr, sync::Arc};

use inventory_service::{
    app,
    config::AppConfig,
    models::{DeleteAck, Product, Report, UpdateAck},
    store::MemoryProductStore,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

struct TestServer {
    addr: SocketAddr,
    client: reqwest::Client,
    store: Arc<MemoryProductStore>,
}

impl TestServer {
    async fn start() -> Self {
        let store = Arc::new(MemoryProductStore::new());
        let router = app::build_with_store(&AppConfig::in_memory(), store.clone())
            .expect("build router");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move { axum::serve(listener, router).await.expect("serve app") });

        Self {
            addr,
            client: reqwest::Client::new(),
            store,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn create(&self, body: Value) -> reqwest::Response {
        self.client
            .post(self.url("/products"))
            .json(&body)
            .send()
            .await
            .expect("create request")
    }

    async fn list(&self, query: &str) -> Vec<Product> {
        let response = self
            .client
            .get(self.url(&format!("/products{}", query)))
            .send()
            .await
            .expect("list request");
        assert_eq!(response.status(), StatusCode::OK);
        response.json().await.expect("product list json")
    }

    async fn seed_fruit(&self) -> (Product, Product) {
        let pineapple = self
            .create(json!({"item": "pineapple", "price": 8, "quantity": 1, "about": "x"}))
            .await
            .json::<Product>()
            .await
            .expect("pineapple json");
        let mango = self
            .create(json!({"item": "mango", "price": 3, "quantity": 10, "about": "y"}))
            .await
            .json::<Product>()
            .await
            .expect("mango json");
        (pineapple, mango)
    }
}

#[tokio::test]
async fn create_returns_201_with_assigned_id() {
    let server = TestServer::start().await;

    let response = server
        .create(json!({"item": "pineapple", "price": 8, "quantity": 1, "about": "pineappleeeee"}))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("json body");
    assert!(Uuid::parse_str(body["_id"].as_str().expect("_id string")).is_ok());
    assert_eq!(body["item"], "pineapple");
    assert_eq!(body["price"], 8.0);
    assert_eq!(body["quantity"], 1);
    assert_eq!(body["about"], "pineappleeeee");
}

#[tokio::test]
async fn create_without_about_stores_empty_string() {
    let server = TestServer::start().await;

    let product: Product = server
        .create(json!({"item": "kiwi", "price": 2, "quantity": 3}))
        .await
        .json()
        .await
        .expect("product json");
    assert_eq!(product.about, "");
}

#[tokio::test]
async fn create_without_required_field_is_400() {
    let server = TestServer::start().await;

    let response = server.create(json!({"item": "kiwi", "quantity": 3})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("error json");
    assert_eq!(body["name"], "ValidationError");
    assert_eq!(body["field"], "price");
    assert!(server.list("").await.is_empty());
}

#[tokio::test]
async fn create_with_malformed_body_is_400() {
    let server = TestServer::start().await;

    let response = server
        .create(json!({"item": "kiwi", "price": "cheap", "quantity": 3}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("error json");
    assert_eq!(body["name"], "BadRequest");
}

#[tokio::test]
async fn duplicate_item_is_rejected() {
    let server = TestServer::start().await;

    let first = server
        .create(json!({"item": "mango", "price": 3, "quantity": 10, "about": "y"}))
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = server
        .create(json!({"item": "mango", "price": 4, "quantity": 1, "about": "z"}))
        .await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: Value = second.json().await.expect("error json");
    assert_eq!(body["name"], "DuplicateKeyError");

    let products = server.list("").await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].price, 3.0);
}

#[tokio::test]
async fn list_sorted_by_price_puts_mango_first() {
    let server = TestServer::start().await;
    server.seed_fruit().await;

    let products = server.list("?sortby=price").await;
    let items: Vec<_> = products.iter().map(|p| p.item.as_str()).collect();
    assert_eq!(items, ["mango", "pineapple"]);
}

#[tokio::test]
async fn list_sorted_by_each_field_is_ascending() {
    let server = TestServer::start().await;
    server.seed_fruit().await;
    server
        .create(json!({"item": "apple", "price": 5, "quantity": 4, "about": "a"}))
        .await;

    let by_item = server.list("?sortby=item").await;
    assert!(by_item.windows(2).all(|w| w[0].item <= w[1].item));

    let by_quantity = server.list("?sortby=quantity").await;
    assert!(by_quantity.windows(2).all(|w| w[0].quantity <= w[1].quantity));

    let by_about = server.list("?sortby=about").await;
    assert!(by_about.windows(2).all(|w| w[0].about <= w[1].about));
}

#[tokio::test]
async fn unknown_sort_key_returns_same_set() {
    let server = TestServer::start().await;
    let (pineapple, mango) = server.seed_fruit().await;

    for query in ["", "?sortby=color", "?sortby=PRICE", "?sortby=price&sortby=item"] {
        let products = server.list(query).await;
        assert_eq!(products.len(), 2, "query {:?}", query);
        assert!(products.contains(&pineapple));
        assert!(products.contains(&mango));
    }
}

#[tokio::test]
async fn update_replaces_all_fields() {
    let server = TestServer::start().await;
    let (pineapple, _) = server.seed_fruit().await;

    let response = server
        .client
        .put(server.url(&format!("/products/{}", pineapple.id)))
        .json(&json!({"item": "strawberry", "price": 1, "quantity": 123}))
        .send()
        .await
        .expect("update request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let products = server.list("?sortby=item").await;
    let updated = products
        .iter()
        .find(|p| p.id == pineapple.id)
        .expect("updated product");
    assert_eq!(updated.item, "strawberry");
    assert_eq!(updated.price, 1.0);
    assert_eq!(updated.quantity, 123);
    assert_eq!(updated.about, "");
}

#[tokio::test]
async fn update_with_partial_body_returns_204() {
    let server = TestServer::start().await;
    let (pineapple, _) = server.seed_fruit().await;
    let path = format!("/products/{}", pineapple.id);

    let response = server
        .client
        .put(server.url(&path))
        .json(&json!({"about": "only about"}))
        .send()
        .await
        .expect("update request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let products = server.list("").await;
    let stored = products
        .iter()
        .find(|p| p.id == pineapple.id)
        .expect("stored product");
    assert_eq!(stored.item, "pineapple");
    assert_eq!(stored.price, 8.0);
    assert_eq!(stored.quantity, 1);
    assert_eq!(stored.about, "only about");

    let response = server
        .client
        .put(server.url(&path))
        .json(&json!({"item": "pineapple", "price": 9}))
        .send()
        .await
        .expect("update request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let products = server.list("").await;
    let stored = products
        .iter()
        .find(|p| p.id == pineapple.id)
        .expect("stored product");
    assert_eq!(stored.price, 9.0);
    assert_eq!(stored.quantity, 1);
    assert_eq!(stored.about, "");
}

#[tokio::test]
async fn update_and_delete_unknown_id_return_204() {
    let server = TestServer::start().await;
    let unknown = Uuid::new_v4();

    let response = server
        .client
        .put(server.url(&format!("/products/{}", unknown)))
        .json(&json!({"item": "ghost", "price": 1, "quantity": 1}))
        .send()
        .await
        .expect("update request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = server
        .client
        .delete(server.url(&format!("/products/{}", unknown)))
        .send()
        .await
        .expect("delete request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn malformed_id_is_400() {
    let server = TestServer::start().await;

    let response = server
        .client
        .delete(server.url("/products/63d28f715691921009e63996"))
        .send()
        .await
        .expect("delete request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("error json");
    assert_eq!(body["name"], "CastError");
}

#[tokio::test]
async fn delete_removes_product() {
    let server = TestServer::start().await;
    let (pineapple, mango) = server.seed_fruit().await;

    let response = server
        .client
        .delete(server.url(&format!("/products/{}", pineapple.id)))
        .send()
        .await
        .expect("delete request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(server.list("").await, vec![mango]);
}

#[tokio::test]
async fn report_sums_product_values() {
    let server = TestServer::start().await;
    server.seed_fruit().await;

    let response = server
        .client
        .get(server.url("/report"))
        .send()
        .await
        .expect("report request");
    assert_eq!(response.status(), StatusCode::OK);

    let report: Report = response.json().await.expect("report json");
    assert_eq!(report.id, "report");
    assert_eq!(report.allproductsvalue, 38.0);

    let mut values: Vec<f64> = report.products.iter().map(|g| g.productvalue).collect();
    values.sort_by(f64::total_cmp);
    assert_eq!(values, [8.0, 30.0]);
}

#[tokio::test]
async fn report_of_empty_store_has_empty_body() {
    let server = TestServer::start().await;

    let response = server
        .client
        .get(server.url("/report"))
        .send()
        .await
        .expect("report request");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.expect("body text").is_empty());
}

#[tokio::test]
async fn store_outage_surfaces_as_400() {
    let server = TestServer::start().await;
    server.store.set_available(false);

    for path in ["/products", "/report", "/health/ready"] {
        let response = server
            .client
            .get(server.url(path))
            .send()
            .await
            .expect("request");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "path {}", path);
        let body: Value = response.json().await.expect("error json");
        assert_eq!(body["name"], "StoreUnavailableError");
    }

    server.store.set_available(true);
    let response = server
        .client
        .get(server.url("/health/ready"))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_reports_ok() {
    let server = TestServer::start().await;

    let body: Value = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .expect("health request")
        .json()
        .await
        .expect("health json");
    assert_eq!(body["status"], "ok");
}

#[test]
fn ack_shapes_use_camel_case() {
    let update = serde_json::to_value(UpdateAck {
        acknowledged: true,
        matched_count: 1,
        modified_count: 0,
    })
    .expect("update ack json");
    assert_eq!(update, json!({"acknowledged": true, "matchedCount": 1, "modifiedCount": 0}));

    let delete = serde_json::to_value(DeleteAck {
        acknowledged: true,
        deleted_count: 1,
    })
    .expect("delete ack json");
    assert_eq!(delete, json!({"acknowledged": true, "deletedCount": 1}));
}
