use actix_web::{test, web, App, HttpResponse};
use pantry::auth::AuthGate;
use pantry::security::{CONTENT_SECURITY_POLICY, STRICT_TRANSPORT_SECURITY};
use pantry::session::SessionRegistry;
use pantry::store::DocumentStore;
use pantry::{config, cors, AppState, SecurityHeaders, DEFAULT_PASSWORD};
use std::sync::Arc;

fn state() -> AppState {
    let tmp = tempfile::tempdir().unwrap();
    AppState {
        store: Arc::new(DocumentStore::open(tmp.path().join("data.json"))),
        sessions: SessionRegistry::new(),
        auth: AuthGate::new(DEFAULT_PASSWORD),
        static_dir: tmp.path().to_path_buf(),
    }
}

fn assert_security_headers(headers: &actix_web::http::header::HeaderMap) {
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("x-xss-protection").unwrap(), "1; mode=block");
    assert_eq!(headers.get("strict-transport-security").unwrap(), STRICT_TRANSPORT_SECURITY);
    assert_eq!(headers.get("content-security-policy").unwrap(), CONTENT_SECURITY_POLICY);
}

#[actix_web::test]
async fn test_security_headers_present() {
    let app = test::init_service(
        App::new()
            .wrap(SecurityHeaders::default())
            .app_data(web::Data::new(state()))
            .configure(config)
    ).await;
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert_security_headers(resp.headers());
}

#[actix_web::test]
async fn test_headers_on_error_responses() {
    let app = test::init_service(
        App::new()
            .wrap(SecurityHeaders::default())
            .app_data(web::Data::new(state()))
            .configure(config)
    ).await;
    let req = test::TestRequest::get().uri("/api/recipes").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    assert_security_headers(resp.headers());
}

#[actix_web::test]
async fn test_headers_overwrite_handler_values() {
    let app = test::init_service(
        App::new()
            .wrap(SecurityHeaders::default())
            .route("/custom", web::get().to(|| async {
                HttpResponse::Ok()
                    .insert_header((actix_web::http::header::X_FRAME_OPTIONS, "SAMEORIGIN"))
                    .finish()
            }))
    ).await;
    let req = test::TestRequest::get().uri("/custom").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("x-frame-options").unwrap(), "DENY");
}

#[actix_web::test]
async fn test_plaintext_redirected_when_enforced() {
    let app = test::init_service(
        App::new()
            .wrap(SecurityHeaders::default().with_https_redirect(true))
            .app_data(web::Data::new(state()))
            .configure(config)
    ).await;
    let req = test::TestRequest::get().uri("/api/health?page=1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 301);
    let location = resp.headers().get("location").unwrap().to_str().unwrap();
    assert!(location.starts_with("https://"), "got {location}");
    assert!(location.ends_with("/api/health?page=1"), "got {location}");
    assert_security_headers(resp.headers());
}

#[actix_web::test]
async fn test_forwarded_https_not_redirected() {
    let app = test::init_service(
        App::new()
            .wrap(SecurityHeaders::default().with_https_redirect(true))
            .app_data(web::Data::new(state()))
            .configure(config)
    ).await;
    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("X-Forwarded-Proto", "https"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn test_no_redirect_outside_production() {
    let app = test::init_service(
        App::new()
            .wrap(SecurityHeaders::default())
            .app_data(web::Data::new(state()))
            .configure(config)
    ).await;
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn test_cors_allows_any_origin() {
    let app = test::init_service(
        App::new()
            .wrap(SecurityHeaders::default())
            .wrap(cors())
            .app_data(web::Data::new(state()))
            .configure(config)
    ).await;
    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("Origin", "https://recipes.example.org"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert!(resp.headers().get("access-control-allow-origin").is_some());

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/prices")
        .insert_header(("Origin", "http://elsewhere.test"))
        .insert_header(("Access-Control-Request-Method", "PUT"))
        .insert_header(("Access-Control-Request-Headers", "authorization, content-type"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert!(resp.headers().get("access-control-allow-methods").is_some());
}
