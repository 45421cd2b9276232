//! Route handlers for the storefront.
//!
//! Every handler reads the session out of the signed cookie jar, does its
//! work against shared state, and renders HTML. Login-gated handlers
//! surface [`AppError::AuthRequired`], which redirects to the login form.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    cart, catalog,
    error::AppError,
    mail::{self, RECEIPT_RECIPIENT},
    pages,
    session::{self, Session},
    state::SharedState,
    users::{Role, UserStoreError},
};

#[derive(Deserialize)]
pub struct CredentialsForm {
    username: String,
    password: String,
}

#[derive(Deserialize)]
pub struct AddToCartForm {
    product_id: String,
    #[serde(default = "default_quantity")]
    quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Deserialize)]
pub struct ContactForm {
    name: String,
    email: String,
    message: String,
}

#[derive(Deserialize)]
pub struct ChatForm {
    message: String,
}

fn require_user(session: &Session) -> Result<String, AppError> {
    session.user.clone().ok_or(AppError::AuthRequired)
}

pub async fn home_handler(
    State(state): State<SharedState>,
    jar: SignedCookieJar,
) -> Result<Html<String>, AppError> {
    let session = session::load(&jar);
    let products = catalog::load(&state.config.catalog_path)?;
    let recommended = catalog::recommendations(&products, &session.cart);

    Ok(Html(pages::home(
        &products,
        &recommended,
        session.user.as_deref(),
    )))
}

pub async fn register_page() -> Html<String> {
    Html(pages::register_form())
}

pub async fn register_handler(
    State(state): State<SharedState>,
    jar: SignedCookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    match state.users.register(&form.username, &form.password, Role::User) {
        Ok(()) => {
            info!("Registered user {}", form.username);
            let mut session = session::load(&jar);
            session.user = Some(form.username);
            Ok((session::store(jar, &session), Redirect::to("/")).into_response())
        }
        Err(UserStoreError::UsernameTaken) => {
            Ok(Html(pages::notice("Username already exists.")).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn login_page() -> Html<String> {
    Html(pages::login_form())
}

pub async fn login_handler(
    State(state): State<SharedState>,
    jar: SignedCookieJar,
    Form(form): Form<CredentialsForm>,
) -> Response {
    if state.users.verify(&form.username, &form.password) {
        let mut session = session::load(&jar);
        session.user = Some(form.username);
        (session::store(jar, &session), Redirect::to("/")).into_response()
    } else {
        warn!("Failed login attempt for {}", form.username);
        Html(pages::login_form()).into_response()
    }
}

pub async fn logout_handler(
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Redirect), AppError> {
    let session = session::load(&jar);
    require_user(&session)?;

    Ok((session::clear(jar), Redirect::to("/")))
}

pub async fn add_to_cart_handler(
    jar: SignedCookieJar,
    Form(form): Form<AddToCartForm>,
) -> Result<(SignedCookieJar, Redirect), AppError> {
    let mut session = session::load(&jar);
    require_user(&session)?;

    session.cart.add(&form.product_id, form.quantity);
    Ok((session::store(jar, &session), Redirect::to("/")))
}

pub async fn checkout_handler(
    State(state): State<SharedState>,
    jar: SignedCookieJar,
) -> Result<Html<String>, AppError> {
    let session = session::load(&jar);
    require_user(&session)?;

    let products = catalog::load(&state.config.catalog_path)?;
    let (items, total) = cart::summarize(&products, &session.cart);

    Ok(Html(pages::checkout(&items, total)))
}

pub async fn place_order_handler(
    State(state): State<SharedState>,
    jar: SignedCookieJar,
) -> Response {
    let mut session = session::load(&jar);
    let user = match require_user(&session) {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };
    let products = match catalog::load(&state.config.catalog_path) {
        Ok(products) => products,
        Err(err) => return err.into_response(),
    };

    let (items, total) = cart::summarize(&products, &session.cart);

    // The cart clear rides on the response whether or not the send
    // succeeds; a mail failure loses the order, there is no stored copy.
    session.cart.clear();
    let jar = session::store(jar, &session);

    let body = mail::receipt_body(&user, &items, total);
    match state
        .mailer
        .send(RECEIPT_RECIPIENT, "Your Malvern Store Order Confirmation", body)
        .await
    {
        Ok(()) => {
            info!("Order receipt sent for {user}");
            (jar, Html(pages::receipt(&items, total))).into_response()
        }
        Err(err) => {
            warn!("Receipt send failed for {user}: {err}");
            (jar, err).into_response()
        }
    }
}

pub async fn admin_handler(
    State(state): State<SharedState>,
    jar: SignedCookieJar,
) -> Result<Html<String>, AppError> {
    let session = session::load(&jar);
    let user = require_user(&session)?;

    match state.users.role(&user) {
        Some(Role::Admin) => Ok(Html(pages::admin_panel())),
        _ => Err(AppError::Forbidden),
    }
}

pub async fn contact_page() -> Html<String> {
    Html(pages::contact_form())
}

pub async fn contact_handler(
    State(state): State<SharedState>,
    Form(form): Form<ContactForm>,
) -> Result<Html<String>, AppError> {
    let body = mail::contact_body(&form.name, &form.email, &form.message);
    let to = state.mailer.sender().to_string();
    state.mailer.send(&to, "New Contact Message", body).await?;

    info!("Contact message forwarded from {}", form.email);
    Ok(Html(pages::contact_thanks()))
}

pub async fn chat_page() -> Html<String> {
    Html(pages::chat(""))
}

pub async fn chat_handler(
    State(state): State<SharedState>,
    Form(form): Form<ChatForm>,
) -> Result<Html<String>, AppError> {
    let reply = state.chat.complete(&form.message).await?;
    Ok(Html(pages::chat(&reply)))
}

#[cfg(test)]
mod tests {
    use std::{
        path::PathBuf,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::{
        chat::ChatClient,
        config::Config,
        mail::Mailer,
        router,
        session::signing_key,
        state::AppState,
        users::InMemoryUsers,
    };

    use super::*;

    static CATALOG_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn write_catalog() -> PathBuf {
        let seq = CATALOG_SEQ.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "malvern-catalog-{}-{seq}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"[
                {"id": 1, "name": "Wireless Mouse", "price": 19.99, "description": "2.4GHz"},
                {"id": 2, "name": "Desk Lamp", "price": 24.50, "description": "warm light"},
                {"id": 3, "name": "Notebook", "price": 4.25, "description": "ruled"},
                {"id": 4, "name": "Water Bottle", "price": 12.00, "description": "750ml"}
            ]"#,
        )
        .unwrap();
        path
    }

    fn test_state() -> SharedState {
        let config = Config {
            port: 0,
            secret_key: "a test signing secret".into(),
            openai_api_key: String::new(),
            openai_api_base: "http://127.0.0.1:9".into(),
            mail_username: "store@example.com".into(),
            mail_password: String::new(),
            smtp_relay: "127.0.0.1".into(),
            catalog_path: write_catalog(),
            admin_password: "1234".into(),
        };

        SharedState(Arc::new(AppState {
            key: signing_key(&config.secret_key),
            users: Arc::new(InMemoryUsers::with_admin(&config.admin_password).unwrap()),
            // Port 9 has no listener, so every send fails fast.
            mailer: Mailer::unencrypted("127.0.0.1", 9, "store@example.com"),
            chat: ChatClient::new(&config),
            config,
        }))
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn cookie_pair(response: &Response<Body>) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .map(|value| value.to_str().unwrap().split(';').next().unwrap().to_string())
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn send(state: &SharedState, request: Request<Body>) -> Response<Body> {
        router(state.clone()).oneshot(request).await.unwrap()
    }

    async fn register(state: &SharedState, username: &str, password: &str) -> String {
        let response = send(
            state,
            post(
                "/register",
                &format!("username={username}&password={password}"),
                None,
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        cookie_pair(&response).expect("registration establishes a session")
    }

    #[tokio::test]
    async fn home_lists_products_and_recommendations() {
        let state = test_state();
        let response = send(&state, get("/", None)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Wireless Mouse"));
        assert!(body.contains("Water Bottle"));
        assert!(body.contains("Recommended for you"));
    }

    #[tokio::test]
    async fn cart_accumulates_and_checkout_totals() {
        let state = test_state();
        let cookie = register(&state, "alice", "hunter2").await;

        let response = send(
            &state,
            post("/add_to_cart", "product_id=1&quantity=2", Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = cookie_pair(&response).unwrap();

        let response = send(
            &state,
            post("/add_to_cart", "product_id=1&quantity=3", Some(&cookie)),
        )
        .await;
        let cookie = cookie_pair(&response).unwrap();

        let response = send(&state, get("/checkout", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        // 5 x 19.99
        assert!(body.contains("<td>5</td>"));
        assert!(body.contains("Total: $99.95"));
    }

    #[tokio::test]
    async fn login_with_wrong_password_sets_no_session() {
        let state = test_state();
        register(&state, "alice", "hunter2").await;

        let response = send(
            &state,
            post("/login", "username=alice&password=wrong", None),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(cookie_pair(&response).is_none());
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let state = test_state();
        register(&state, "alice", "original").await;

        let response = send(
            &state,
            post("/register", "username=alice&password=replacement", None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(cookie_pair(&response).is_none());
        let body = body_text(response).await;
        assert!(body.contains("Username already exists."));

        // The original record is untouched.
        let response = send(
            &state,
            post("/login", "username=alice&password=original", None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn admin_route_checks_role() {
        let state = test_state();

        let response = send(&state, post("/login", "username=admin&password=1234", None)).await;
        let admin_cookie = cookie_pair(&response).unwrap();
        let response = send(&state, get("/admin", Some(&admin_cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Welcome to the admin panel!"));

        let user_cookie = register(&state, "bob", "pw").await;
        let response = send(&state, get("/admin", Some(&user_cookie))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn anonymous_cart_routes_redirect_to_login() {
        let state = test_state();
        let response = send(&state, post("/add_to_cart", "product_id=1", None)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn place_order_clears_cart_even_when_mail_fails() {
        let state = test_state();
        let cookie = register(&state, "alice", "hunter2").await;

        let response = send(
            &state,
            post("/add_to_cart", "product_id=2&quantity=1", Some(&cookie)),
        )
        .await;
        let cookie = cookie_pair(&response).unwrap();

        let response = send(&state, post("/place_order", "", Some(&cookie))).await;
        // The test mailer has no listener behind it, so the send fails.
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let cookie = cookie_pair(&response).expect("cart clear still sets the cookie");

        let response = send(&state, get("/checkout", Some(&cookie))).await;
        let body = body_text(response).await;
        assert!(body.contains("Total: $0.00"));
        assert!(!body.contains("Desk Lamp"));
    }

    #[tokio::test]
    async fn chat_remote_failure_is_bad_gateway() {
        let state = test_state();

        let response = send(&state, get("/chat", None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        // The completion API base points at a dead port, so the forward
        // fails and surfaces as a gateway error.
        let response = send(&state, post("/chat", "message=hello", None)).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
