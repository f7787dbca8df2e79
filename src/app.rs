use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{checkins, coach, onboarding, profiles, state::AppState};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(onboarding::handlers::routes())
                .merge(checkins::handlers::routes())
                .merge(coach::router())
                .merge(profiles::handlers::routes())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        extract::FromRef,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::{auth::jwt::JwtKeys, profiles::repo_types::Role};

    fn bearer(state: &AppState, user_id: Uuid, role: Role) -> String {
        let token = JwtKeys::from_ref(state).sign(user_id, role).unwrap();
        format!("Bearer {token}")
    }

    fn request(method: Method, uri: &str, auth: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        match body {
            Some(b) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(res: axum::response::Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let (state, _) = AppState::fake();
        let res = build_app(state)
            .oneshot(request(Method::GET, "/api/v1/health", None, None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn coach_routes_require_a_token() {
        let (state, _) = AppState::fake();
        let res = build_app(state)
            .oneshot(request(Method::GET, "/api/v1/coach/clients", None, None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(res).await["error"], "unauthorized");
    }

    #[tokio::test]
    async fn clients_cannot_reach_coach_routes() {
        let (state, mem) = AppState::fake();
        let client = mem.add_profile("c@example.com", Role::Client);
        let auth = bearer(&state, client, Role::Client);
        let res = build_app(state)
            .oneshot(request(Method::GET, "/api/v1/coach/clients", Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn coach_override_creates_first_version() {
        let (state, mem) = AppState::fake();
        let client = mem.add_profile("c@example.com", Role::Client);
        let auth = bearer(&state, Uuid::new_v4(), Role::Coach);
        let body = json!({ "calorieTarget": 2200, "proteinG": 180, "carbsG": 220, "fatG": 70 });

        let res = build_app(state)
            .oneshot(request(
                Method::PUT,
                &format!("/api/v1/coach/clients/{client}/macros"),
                Some(&auth),
                Some(body),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = json_body(res).await;
        assert_eq!(json["version"], 1);
        assert_eq!(json["calorieTarget"], 2200);
        assert_eq!(json["formulaUsed"], "coach_override");
        assert_eq!(json["explanation"], "Coach manual override");
    }

    #[tokio::test]
    async fn invalid_override_is_a_bad_request_naming_the_field() {
        let (state, mem) = AppState::fake();
        let client = mem.add_profile("c@example.com", Role::Client);
        let auth = bearer(&state, Uuid::new_v4(), Role::Admin);
        let body = json!({ "calorieTarget": 2200, "proteinG": -5, "carbsG": 220, "fatG": 70 });

        let res = build_app(state)
            .oneshot(request(
                Method::PUT,
                &format!("/api/v1/coach/clients/{client}/macros"),
                Some(&auth),
                Some(body),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await["field"], "proteinG");
    }

    #[tokio::test]
    async fn editing_missing_training_plan_is_not_found() {
        let (state, mem) = AppState::fake();
        let client = mem.add_profile("c@example.com", Role::Client);
        let auth = bearer(&state, Uuid::new_v4(), Role::Coach);

        let res = build_app(state)
            .oneshot(request(
                Method::PATCH,
                &format!("/api/v1/coach/clients/{client}/training-plan"),
                Some(&auth),
                Some(json!({ "durationWeeks": 8 })),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(res).await["message"],
            "No training plan found for this client"
        );
    }

    #[tokio::test]
    async fn unknown_history_kind_is_rejected() {
        let (state, mem) = AppState::fake();
        let client = mem.add_profile("c@example.com", Role::Client);
        let auth = bearer(&state, Uuid::new_v4(), Role::Coach);

        let res = build_app(state)
            .oneshot(request(
                Method::GET,
                &format!("/api/v1/coach/clients/{client}/history/diet"),
                Some(&auth),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn admin_sets_subscription_status() {
        let (state, mem) = AppState::fake();
        let client = mem.add_profile("c@example.com", Role::Client);
        let admin = bearer(&state, Uuid::new_v4(), Role::Admin);
        let coach = bearer(&state, Uuid::new_v4(), Role::Coach);
        let uri = format!("/api/v1/admin/clients/{client}/subscription");
        let body = json!({ "subscriptionStatus": "active" });

        let res = build_app(state.clone())
            .oneshot(request(Method::PUT, &uri, Some(&coach), Some(body.clone())))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = build_app(state)
            .oneshot(request(Method::PUT, &uri, Some(&admin), Some(body)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await["subscriptionStatus"], "active");
    }
}
