//! Session lifecycle: rehydration at startup, login, logout.

use paymall_client::{ProfileUpdate, RegisterRequest};
use paymall_integration_tests::{TestContext, login_json, order_list_json, user_json};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

/// Startup with a valid refresh cookie costs exactly one refresh call and
/// one profile fetch, and leaves the session authenticated.
#[tokio::test]
async fn initialize_rehydrates_with_one_refresh_and_one_profile_fetch() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/users/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "rehydrated"})))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/profile/"))
        .and(header("authorization", "Bearer rehydrated"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let session = ctx.session();
    assert!(session.initialize().await);
    assert!(session.is_authenticated().await);

    let user = session.current_user().await.expect("user must be stored");
    assert_eq!(user.email.as_str(), "asha@example.com");
    assert_eq!(user.display_name(), "Asha Verma");
}

/// A successful login installs the bearer token; the next request carries it.
#[tokio::test]
async fn login_installs_bearer_token() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/users/token/"))
        .and(body_json(json!({"email": "asha@example.com", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_json("session-token")))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/orders/"))
        .and(header("authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_list_json()))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let session = ctx.session();
    let signed_in = session
        .login("asha@example.com", "hunter2")
        .await
        .expect("transport must succeed");
    assert!(signed_in);
    assert!(session.is_authenticated().await);

    ctx.orders().list().await.expect("bearer must be accepted");
}

/// Bad credentials come back as `Ok(false)`, not an error, and the session
/// stays anonymous. The token endpoint's 401 is routed through the refresh
/// coordinator like any other, so a failing refresh is mocked too.
#[tokio::test]
async fn rejected_login_leaves_session_anonymous() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/users/token/"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "No active account found"})),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users/token/refresh/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&ctx.server)
        .await;

    let session = ctx.session();
    let signed_in = session
        .login("asha@example.com", "wrong")
        .await
        .expect("a rejection is not a transport error");
    assert!(!signed_in);
    assert!(!session.is_authenticated().await);
}

/// Registration signs the new account in: the bearer token is installed
/// and the user stored, exactly like a login.
#[tokio::test]
async fn register_installs_bearer_token() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/users/register/"))
        .and(body_json(json!({
            "email": "asha@example.com",
            "password": "hunter2",
            "first_name": "Asha",
            "last_name": "Verma"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(login_json("new-account")))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/orders/"))
        .and(header("authorization", "Bearer new-account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_list_json()))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let session = ctx.session();
    let request = RegisterRequest {
        email: "asha@example.com".to_string(),
        password: "hunter2".to_string(),
        first_name: "Asha".to_string(),
        last_name: "Verma".to_string(),
        phone_number: None,
    };
    assert!(session.register(&request).await.expect("transport"));
    assert!(session.is_authenticated().await);

    ctx.orders().list().await.expect("bearer must be accepted");
}

/// A profile update refreshes the stored user with the server's response.
#[tokio::test]
async fn update_profile_refreshes_the_stored_user() {
    let ctx = TestContext::new().await;

    Mock::given(method("PUT"))
        .and(path("/users/profile/"))
        .and(body_json(json!({"first_name": "Ashabai"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "email": "asha@example.com",
            "first_name": "Ashabai",
            "last_name": "Verma",
            "phone_number": "+91-98000-00000"
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let session = ctx.session();
    let update = ProfileUpdate {
        first_name: Some("Ashabai".to_string()),
        ..ProfileUpdate::default()
    };
    let user = session.update_profile(&update).await.expect("update");
    assert_eq!(user.first_name, "Ashabai");

    let stored = session.current_user().await.expect("user must be stored");
    assert_eq!(stored.display_name(), "Ashabai Verma");
}

/// Logout clears the token even though the server call is best-effort;
/// requests after it go out without a bearer header.
#[tokio::test]
async fn logout_drops_the_bearer_token() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/users/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_json("session-token")))
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users/logout/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/orders/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_list_json()))
        .mount(&ctx.server)
        .await;

    let session = ctx.session();
    assert!(session.login("asha@example.com", "hunter2").await.expect("login"));

    session.logout().await;
    assert!(!session.is_authenticated().await);

    ctx.orders().list().await.expect("anonymous list still resolves");
    let requests = ctx.server.received_requests().await.expect("recording enabled");
    let orders_call = requests
        .iter()
        .find(|r| r.url.path() == "/orders/orders/")
        .expect("one orders call");
    assert!(!orders_call.headers.contains_key("authorization"));
}
