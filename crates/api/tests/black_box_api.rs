use marketplace_api::ApiConfig;
use reqwest::StatusCode;
use serde_json::{Value, json};

const PASSWORD: &str = "password123";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, cheap bcrypt, ephemeral port.
        let config = ApiConfig {
            bcrypt_cost: 4,
            ..ApiConfig::default()
        };
        let app = marketplace_api::build_app(&config)
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sign up and log in; returns `(user_id, auth_token)`.
    async fn signup(&self, email: &str) -> (String, String) {
        let res = self
            .client
            .post(self.url("/users"))
            .json(&json!({ "user": { "email": email, "password": PASSWORD, "password_confirmation": PASSWORD } }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let user: Value = res.json().await.unwrap();
        let id = user["id"].as_str().unwrap().to_string();

        let res = self
            .client
            .post(self.url("/sessions"))
            .json(&json!({ "session": { "email": email, "password": PASSWORD } }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let session: Value = res.json().await.unwrap();
        assert_eq!(session["user"]["id"], json!(id));
        let token = session["auth_token"].as_str().unwrap().to_string();

        (id, token)
    }

    async fn create_product(&self, user_id: &str, token: &str, title: &str, price: &str) -> Value {
        let res = self
            .client
            .post(self.url(&format!("/users/{user_id}/products")))
            .header("Authorization", token)
            .json(&json!({ "product": { "title": title, "price": price, "published": true } }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = res.json().await.unwrap();
        body["product"].clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_unversioned_and_unknown_routes_are_json_404() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv.client.get(srv.url("/nowhere")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "errors": "Not found" }));
}

#[tokio::test]
async fn wrong_method_on_a_known_path_is_json_405() {
    let srv = TestServer::spawn().await;

    let res = srv.client.post(srv.url("/products")).json(&json!({})).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "errors": "Method not allowed" }));

    let res = srv.client.get(srv.url("/sessions")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "errors": "Method not allowed" }));
}

#[tokio::test]
async fn any_accept_header_is_served() {
    let srv = TestServer::spawn().await;

    for accept in [
        "application/vnd.marketplace.v1",
        "application/vnd.marketplace.v1+json",
        "application/vnd.marketplace.v42",
        "application/json",
        "*/*",
        "garbage;;;",
    ] {
        let res = srv
            .client
            .get(srv.url("/products"))
            .header("Accept", accept)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "accept={accept}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "products": [] }));
    }
}

#[tokio::test]
async fn signup_validation_errors_are_reported_per_field() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .post(srv.url("/users"))
        .json(&json!({ "user": { "password": "123456780", "password_confirmation": "12345678" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert!(body["errors"]["email"].as_array().unwrap().contains(&json!("can't be blank")));
    assert!(body["errors"]["password_confirmation"]
        .as_array()
        .unwrap()
        .contains(&json!("doesn't match Password")));

    // No root key at all is an empty payload.
    let res = srv.client.post(srv.url("/users")).json(&json!({})).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn duplicate_email_is_taken() {
    let srv = TestServer::spawn().await;
    srv.signup("dup@example.com").await;

    let res = srv
        .client
        .post(srv.url("/users"))
        .json(&json!({ "user": { "email": "DUP@example.com", "password": PASSWORD } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["errors"]["email"], json!(["has already been taken"]));
}

#[tokio::test]
async fn show_user_never_exposes_secrets() {
    let srv = TestServer::spawn().await;
    let (id, token) = srv.signup("reader@example.com").await;

    let res = srv.client.get(srv.url(&format!("/users/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "id": id, "email": "reader@example.com", "product_ids": [] }));
    assert!(!body.to_string().contains(&token));

    let res = srv.client.get(srv.url("/users/not-a-uuid")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_with_bad_credentials_is_rejected() {
    let srv = TestServer::spawn().await;
    srv.signup("login@example.com").await;

    let res = srv
        .client
        .post(srv.url("/sessions"))
        .json(&json!({ "session": { "email": "login@example.com", "password": "wrong-password" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "errors": "Invalid email or password" }));
}

#[tokio::test]
async fn update_email_round_trip_changes_only_the_email() {
    let srv = TestServer::spawn().await;
    let (id, token) = srv.signup("before@example.com").await;
    let product = srv.create_product(&id, &token, "Lamp", "10").await;

    let res = srv
        .client
        .patch(srv.url(&format!("/users/{id}")))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "user": { "email": "after@example.com" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv.client.get(srv.url(&format!("/users/{id}"))).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "id": id, "email": "after@example.com", "product_ids": [product["id"]] })
    );

    let res = srv
        .client
        .patch(srv.url(&format!("/users/{id}")))
        .header("Authorization", &token)
        .json(&json!({ "user": { "email": "bademail.com" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["errors"]["email"], json!(["is invalid"]));
}

#[tokio::test]
async fn writes_need_the_owners_token() {
    let srv = TestServer::spawn().await;
    let (alice, _alice_token) = srv.signup("alice@example.com").await;
    let (_bob, bob_token) = srv.signup("bob@example.com").await;

    // No token at all.
    let res = srv
        .client
        .patch(srv.url(&format!("/users/{alice}")))
        .json(&json!({ "user": { "email": "x@example.com" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "errors": "Not authenticated" }));

    // Somebody else's token.
    let res = srv
        .client
        .delete(srv.url(&format!("/users/{alice}")))
        .header("Authorization", &bob_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Tokens are case-sensitive.
    let res = srv
        .client
        .delete(srv.url(&format!("/users/{alice}")))
        .header("Authorization", bob_token.to_uppercase())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn product_lifecycle() {
    let srv = TestServer::spawn().await;
    let (id, token) = srv.signup("seller@example.com").await;

    let product = srv.create_product(&id, &token, "Desk", "120.50").await;
    assert_eq!(product["title"], json!("Desk"));
    assert_eq!(product["price"], json!("120.50"));
    assert_eq!(product["published"], json!(true));
    assert_eq!(product["user"]["email"], json!("seller@example.com"));
    let product_id = product["id"].as_str().unwrap().to_string();

    let res = srv
        .client
        .put(srv.url(&format!("/users/{id}/products/{product_id}")))
        .header("Authorization", &token)
        .json(&json!({ "product": { "title": "Standing desk" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["product"]["title"], json!("Standing desk"));
    assert_eq!(body["product"]["price"], json!("120.50"));

    let res = srv
        .client
        .get(srv.url(&format!("/products/{product_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv
        .client
        .delete(srv.url(&format!("/users/{id}/products/{product_id}")))
        .header("Authorization", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.text().await.unwrap().is_empty());

    let res = srv
        .client
        .get(srv.url(&format!("/products/{product_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "errors": "Not found" }));
}

#[tokio::test]
async fn invalid_prices_are_not_numbers() {
    let srv = TestServer::spawn().await;
    let (id, token) = srv.signup("prices@example.com").await;

    for price in [json!("twenty"), json!("12abc"), json!(true)] {
        let res = srv
            .client
            .post(srv.url(&format!("/users/{id}/products")))
            .header("Authorization", &token)
            .json(&json!({ "product": { "title": "Thing", "price": price } }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY, "price={price}");
        let body: Value = res.json().await.unwrap();
        assert!(body["errors"]["price"]
            .as_array()
            .unwrap()
            .contains(&json!("is not a number")));
    }

    let product = srv.create_product(&id, &token, "Thing", "3").await;
    let res = srv
        .client
        .patch(srv.url(&format!("/users/{id}/products/{}", product["id"].as_str().unwrap())))
        .header("Authorization", &token)
        .json(&json!({ "product": { "price": "cheap" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["errors"]["price"], json!(["is not a number"]));
}

#[tokio::test]
async fn other_users_products_are_off_limits() {
    let srv = TestServer::spawn().await;
    let (alice, alice_token) = srv.signup("alice@example.com").await;
    let (bob, bob_token) = srv.signup("bob@example.com").await;
    let product = srv.create_product(&alice, &alice_token, "Chair", "45").await;
    let product_id = product["id"].as_str().unwrap();

    // Bob addressing Alice's product through his own path.
    let res = srv
        .client
        .delete(srv.url(&format!("/users/{bob}/products/{product_id}")))
        .header("Authorization", &bob_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Bob addressing Alice's path.
    let res = srv
        .client
        .patch(srv.url(&format!("/users/{alice}/products/{product_id}")))
        .header("Authorization", &bob_token)
        .json(&json!({ "product": { "title": "Mine now" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // A product that does not exist at all.
    let res = srv
        .client
        .delete(srv.url(&format!("/users/{bob}/products/{}", uuid::Uuid::now_v7())))
        .header("Authorization", &bob_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_index_filters_by_ids() {
    let srv = TestServer::spawn().await;
    let (alice, alice_token) = srv.signup("alice@example.com").await;
    let (bob, bob_token) = srv.signup("bob@example.com").await;

    let a1 = srv.create_product(&alice, &alice_token, "A1", "1").await;
    let a2 = srv.create_product(&alice, &alice_token, "A2", "2").await;
    srv.create_product(&bob, &bob_token, "B1", "3").await;

    let res = srv.client.get(srv.url("/products")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["products"].as_array().unwrap().len(), 3);

    let user: Value = srv
        .client
        .get(srv.url(&format!("/users/{alice}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<&str> = user["product_ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![a1["id"].as_str().unwrap(), a2["id"].as_str().unwrap()]);

    let res = srv
        .client
        .get(srv.url(&format!("/products?product_ids={}", ids.join(","))))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    let products = body["products"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|p| p["user"]["email"] == json!("alice@example.com")));

    let res = srv
        .client
        .get(srv.url(&format!("/products?product_ids[]={}&product_ids[]=junk", ids[0])))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["products"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn orders_total_the_selected_products() {
    let srv = TestServer::spawn().await;
    let (seller, seller_token) = srv.signup("seller@example.com").await;
    let (buyer, buyer_token) = srv.signup("buyer@example.com").await;
    let p1 = srv.create_product(&seller, &seller_token, "P1", "19.99").await;
    let p2 = srv.create_product(&seller, &seller_token, "P2", "5.01").await;

    let res = srv
        .client
        .post(srv.url(&format!("/users/{buyer}/orders")))
        .header("Authorization", &buyer_token)
        .json(&json!({ "order": { "product_ids": [p1["id"], p2["id"]], "total": "0.01" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    let order = &body["order"];
    assert_eq!(order["total"], json!("25.00"));
    assert_eq!(order["products"].as_array().unwrap().len(), 2);
    assert!(order["products"][0].get("user").is_none());
    let order_id = order["id"].as_str().unwrap().to_string();

    let res = srv
        .client
        .get(srv.url(&format!("/users/{buyer}/orders")))
        .header("Authorization", &buyer_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["orders"].as_array().unwrap().len(), 1);

    let res = srv
        .client
        .get(srv.url(&format!("/users/{buyer}/orders/{order_id}")))
        .header("Authorization", &buyer_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["order"]["id"], json!(order_id));

    // Orders are owner-only, even for reads.
    let res = srv
        .client
        .get(srv.url(&format!("/users/{buyer}/orders")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .get(srv.url(&format!("/users/{seller}/orders/{order_id}")))
        .header("Authorization", &seller_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .delete(srv.url(&format!("/users/{buyer}/orders/{order_id}")))
        .header("Authorization", &seller_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .delete(srv.url(&format!("/users/{buyer}/orders/{order_id}")))
        .header("Authorization", &buyer_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn orders_need_known_products() {
    let srv = TestServer::spawn().await;
    let (buyer, token) = srv.signup("buyer@example.com").await;

    let res = srv
        .client
        .post(srv.url(&format!("/users/{buyer}/orders")))
        .header("Authorization", &token)
        .json(&json!({ "order": { "product_ids": [] } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["errors"]["product_ids"], json!(["can't be blank"]));

    let res = srv
        .client
        .post(srv.url(&format!("/users/{buyer}/orders")))
        .header("Authorization", &token)
        .json(&json!({ "order": { "product_ids": [uuid::Uuid::now_v7().to_string()] } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["errors"]["product_ids"], json!(["is invalid"]));
}

#[tokio::test]
async fn order_totals_beyond_the_decimal_range_are_rejected() {
    let srv = TestServer::spawn().await;
    let (id, token) = srv.signup("big@example.com").await;
    let max = "79228162514264337593543950335";
    let p1 = srv.create_product(&id, &token, "Gold", max).await;
    let p2 = srv.create_product(&id, &token, "Platinum", max).await;

    let res = srv
        .client
        .post(srv.url(&format!("/users/{id}/orders")))
        .header("Authorization", &token)
        .json(&json!({ "order": { "product_ids": [p1["id"], p2["id"]] } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["errors"]["total"], json!(["is too large"]));

    // The server is still serving.
    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn orders_outlive_their_products() {
    let srv = TestServer::spawn().await;
    let (seller, seller_token) = srv.signup("seller@example.com").await;
    let (buyer, buyer_token) = srv.signup("buyer@example.com").await;
    let product = srv.create_product(&seller, &seller_token, "Rug", "30").await;
    let product_id = product["id"].as_str().unwrap().to_string();

    let res = srv
        .client
        .post(srv.url(&format!("/users/{buyer}/orders")))
        .header("Authorization", &buyer_token)
        .json(&json!({ "order": { "product_ids": [product_id] } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    let order_id = body["order"]["id"].as_str().unwrap().to_string();

    let res = srv
        .client
        .delete(srv.url(&format!("/users/{seller}/products/{product_id}")))
        .header("Authorization", &seller_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = srv
        .client
        .get(srv.url(&format!("/users/{buyer}/orders/{order_id}")))
        .header("Authorization", &buyer_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["order"]["total"], json!("30"));
    assert_eq!(body["order"]["products"], json!([]));
}

#[tokio::test]
async fn logout_of_a_token_you_do_not_hold_is_rejected() {
    let srv = TestServer::spawn().await;
    let (alice, alice_token) = srv.signup("alice@example.com").await;
    let (_bob, bob_token) = srv.signup("bob@example.com").await;

    // Nobody holds this token.
    let res = srv
        .client
        .delete(srv.url("/sessions/no-such-token"))
        .header("Authorization", &bob_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "errors": "Not authenticated" }));

    // Bob cannot log Alice out.
    let res = srv
        .client
        .delete(srv.url(&format!("/sessions/{alice_token}")))
        .header("Authorization", &bob_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Alice's token still works.
    let res = srv
        .client
        .post(srv.url(&format!("/users/{alice}/products")))
        .header("Authorization", &alice_token)
        .json(&json!({ "product": { "title": "Still here", "price": "1" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn logout_rotates_the_token() {
    let srv = TestServer::spawn().await;
    let (id, token) = srv.signup("leaving@example.com").await;

    let res = srv
        .client
        .delete(srv.url(&format!("/sessions/{token}")))
        .header("Authorization", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = srv
        .client
        .post(srv.url(&format!("/users/{id}/products")))
        .header("Authorization", &token)
        .json(&json!({ "product": { "title": "Late", "price": "1" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn destroying_a_user_removes_their_products() {
    let srv = TestServer::spawn().await;
    let (id, token) = srv.signup("gone@example.com").await;
    let product = srv.create_product(&id, &token, "Vase", "8").await;

    let res = srv
        .client
        .delete(srv.url(&format!("/users/{id}")))
        .header("Authorization", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = srv.client.get(srv.url(&format!("/users/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = srv
        .client
        .get(srv.url(&format!("/products/{}", product["id"].as_str().unwrap())))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
