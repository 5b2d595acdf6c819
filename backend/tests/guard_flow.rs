//! End-to-end navigation flow: login through the session API, then walk the
//! guarded dashboard routes and follow the redirects the guard hands out.

use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use actix_web::http::{header, StatusCode};
use actix_web::{test, web};
use serde_json::json;

use backend::domain::ports::FixtureAuthProvider;
use backend::domain::AuthProvider;
use backend::inbound::http::health::HealthState;
use backend::server::build_app;

fn developer_provider() -> Arc<dyn AuthProvider> {
    Arc::new(FixtureAuthProvider::new(
        "dev@example.com",
        "secret",
        json!({
            "user_id": "9",
            "email": "dev@example.com",
            "name": "Dev Eloper",
            "organization_role": "developer",
            "organization_id": "org-1",
            "organization_name": "Example Corp",
        }),
    ))
}

async fn gateway(
    provider: Arc<dyn AuthProvider>,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();
    test::init_service(build_app(
        health_state,
        provider,
        Key::generate(),
        false,
        SameSite::Lax,
    ))
    .await
}

fn location_of<B>(res: &actix_web::dev::ServiceResponse<B>) -> String {
    res.headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .expect("ascii header")
        .to_owned()
}

#[actix_web::test]
async fn login_then_navigate_settles_without_redirect_loops() {
    let app = gateway(developer_provider()).await;

    // Anonymous navigation lands on the login page.
    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&res), "/login");

    // Sign in through the session API.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"email": "dev@example.com", "password": "secret"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned();
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["redirect"], "/organization/developer/dashboard");

    // A page above the developer's rank redirects to their own dashboard.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/admin/dashboard")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let target = location_of(&res);
    assert_eq!(target, "/organization/developer/dashboard");

    // Following the redirect renders; the decision is stable on re-visits.
    for _ in 0..2 {
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&target)
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    // Logout drops the session; the dashboard is gated again.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie cleared")
        .into_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&target)
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&res), "/login");
}

#[actix_web::test]
async fn superuser_login_reaches_the_superadmin_dashboard() {
    let app = gateway(Arc::new(FixtureAuthProvider::dev_admin())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"email": "admin@example.com", "password": "password"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned();
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["redirect"], "/superadmin");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/superadmin")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn readiness_probe_answers_ok() {
    let app = gateway(developer_provider()).await;
    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/health/ready").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}
