use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use chrono::DateTime;
use chrono::Utc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::patients::create_patient::create_patient;
use super::handlers::patients::delete_patient::delete_patient;
use super::handlers::patients::get_patient::get_patient;
use super::handlers::patients::import_patients::import_patients;
use super::handlers::patients::list_patients::list_patients;
use super::handlers::patients::update_patient::update_patient;
use super::handlers::system::fallback;
use super::handlers::system::health;
use super::handlers::system::metrics;
use super::handlers::system::root;
use super::handlers::users::current_user::current_user;
use super::handlers::users::issue_token::issue_token;
use super::handlers::users::register::register;
use super::middleware::authenticate as auth_middleware;
use crate::domain::patient::ports::PatientServicePort;
use crate::domain::user::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub patient_service: Arc<dyn PatientServicePort>,
    pub started_at: DateTime<Utc>,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    patient_service: Arc<dyn PatientServicePort>,
) -> Router {
    let state = AppState {
        auth_service,
        patient_service,
        started_at: Utc::now(),
    };

    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/auth/register", post(register))
        .route("/auth/token", post(issue_token));

    let protected_routes = Router::new()
        .route("/auth/me", get(current_user))
        .route("/patients", post(create_patient).get(list_patients))
        .route("/patients/import-data", post(import_patients))
        .route(
            "/patients/:patient_id",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(fallback)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::header;
    use axum::http::StatusCode;
    use chrono::Duration as TokenTtl;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::patient::errors::PatientError;
    use crate::domain::patient::models::ExternalPatient;
    use crate::domain::patient::ports::PatientSource;
    use crate::domain::patient::service::PatientService;
    use crate::domain::user::service::AuthService;
    use crate::outbound::repositories::InMemoryPatientRepository;
    use crate::outbound::repositories::InMemoryUserRepository;

    struct EmptySource;

    #[async_trait::async_trait]
    impl PatientSource for EmptySource {
        async fn fetch_patients(&self, _count: u32) -> Result<Vec<ExternalPatient>, PatientError> {
            Ok(Vec::new())
        }
    }

    fn router() -> Router {
        let authenticator = Arc::new(auth::Authenticator::new(
            b"router_test_secret_at_least_32_bytes",
            TokenTtl::minutes(30),
        ));
        let auth_service = Arc::new(AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            authenticator,
        ));
        let patient_service = Arc::new(PatientService::new(
            Arc::new(InMemoryPatientRepository::new()),
            Arc::new(EmptySource),
        ));
        create_router(auth_service, patient_service)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status_code"], 200);
        assert_eq!(body["data"]["status"], "healthy");
    }

    #[tokio::test]
    async fn test_metrics() {
        let response = router()
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["service"], "patient-service");
        assert_eq!(body["data"]["status"], "healthy");
        assert!(body["data"]["uptime_seconds"].as_i64().unwrap() >= 0);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let response = router()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["data"]["message"], "Not found");
    }

    #[tokio::test]
    async fn test_protected_route_without_credentials() {
        let response = router()
            .oneshot(Request::get("/patients").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["data"]["message"], "Not authenticated");
    }

    #[tokio::test]
    async fn test_protected_route_with_garbage_token() {
        let response = router()
            .oneshot(
                Request::get("/auth/me")
                    .header(header::AUTHORIZATION, "Bearer invalid-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
        let body = body_json(response).await;
        assert_eq!(body["data"]["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_incomplete_json_body_is_bad_request() {
        let response = router()
            .oneshot(
                Request::post("/auth/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"username":"alice01","email":"alice@x.com"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["status_code"], 400);
        assert!(body["data"]["message"]
            .as_str()
            .unwrap()
            .contains("missing field `password`"));
    }
}
