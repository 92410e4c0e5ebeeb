//! Local API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`. The browser front end is served from
//! another origin, so CORS is open; requests are traced at the HTTP layer.

use std::sync::Arc;

use axum::http::Method;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the local API router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/form/sample", get(endpoints::assess::sample))
        .route("/assess", post(endpoints::assess::submit))
        .route(
            "/scenario",
            get(endpoints::scenario::current)
                .put(endpoints::scenario::edit)
                .post(endpoints::scenario::replace),
        )
        .route("/scenario/reset", post(endpoints::scenario::reset))
        .route("/scenario/apply", post(endpoints::scenario::apply))
        .route("/scenario/error", delete(endpoints::scenario::dismiss_error))
        .route("/connectivity", put(endpoints::connectivity::update))
        .route(
            "/history",
            get(endpoints::history::list).delete(endpoints::history::clear),
        )
        .route("/history/latest", get(endpoints::history::latest))
        .route("/history/export.csv", get(endpoints::history::export_csv))
        .with_state(ctx);

    Router::new()
        .nest("/api", routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::history::HistoryStore;
    use crate::predictor::mock::MockPredictor;

    fn test_app(mock: Arc<MockPredictor>) -> (Router, Arc<CoreState>) {
        let config = AppConfig {
            debounce: Duration::from_millis(400),
            ..AppConfig::default()
        };
        let core = Arc::new(CoreState::new(
            config,
            mock,
            HistoryStore::open_in_memory().unwrap(),
        ));
        (api_router(core.clone()), core)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_req(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_req(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn sample_form_json() -> serde_json::Value {
        serde_json::json!({
            "Age": "50", "Gender": "1", "Height": "170", "Weight": "70",
            "BMI": "24.2", "Smoking": "0", "GeneticRisk": "2",
            "PhysicalActivity": "5.0", "AlcoholIntake": "2.5", "CancerHistory": "0"
        })
    }

    #[tokio::test(start_paused = true)]
    async fn health_reports_version_and_connectivity() {
        let (app, _) = test_app(Arc::new(MockPredictor::new(0.42)));
        let response = app.oneshot(get_req("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::config::APP_VERSION);
        assert_eq!(json["online"], true);
    }

    #[tokio::test(start_paused = true)]
    async fn sample_form_uses_wire_names() {
        let (app, _) = test_app(Arc::new(MockPredictor::new(0.42)));
        let response = app.oneshot(get_req("/api/form/sample")).await.unwrap();
        assert_eq!(body_json(response).await, sample_form_json());
    }

    #[tokio::test(start_paused = true)]
    async fn assess_returns_tier_and_advice() {
        let (app, core) = test_app(Arc::new(MockPredictor::new(0.72)));
        let response = app
            .oneshot(json_req(Method::POST, "/api/assess", sample_form_json()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["percent"], "72.0%");
        assert_eq!(json["tier"]["tier"], "danger");
        assert_eq!(json["payload"]["Age"], 50);
        assert_eq!(json["scenario"]["phase"], "settled");
        assert!(!json["advice"].as_array().unwrap().is_empty());
        assert_eq!(core.history_len().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn assess_rejects_invalid_form() {
        let mock = Arc::new(MockPredictor::new(0.42));
        let (app, _) = test_app(mock.clone());
        let mut form = sample_form_json();
        form["Age"] = "15".into();

        let response = app
            .oneshot(json_req(Method::POST, "/api/assess", form))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_FAILED");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn assess_reports_predictor_failure() {
        let mock = Arc::new(MockPredictor::new(0.42));
        mock.fail_with_status(500, "model crashed");
        let (app, _) = test_app(mock);

        let response = app
            .oneshot(json_req(Method::POST, "/api/assess", sample_form_json()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["error"]["message"], "model crashed");
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_edit_requires_assessment() {
        let (app, _) = test_app(Arc::new(MockPredictor::new(0.42)));
        let response = app
            .oneshot(json_req(
                Method::PUT,
                "/api/scenario",
                serde_json::json!({ "Smoking": 1 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_edit_settles_on_model_result() {
        let mock = Arc::new(MockPredictor::new(0.42));
        let (app, _) = test_app(mock.clone());
        app.clone()
            .oneshot(json_req(Method::POST, "/api/assess", sample_form_json()))
            .await
            .unwrap();

        mock.set_probability(0.18);
        let response = app
            .clone()
            .oneshot(json_req(
                Method::PUT,
                "/api/scenario",
                serde_json::json!({ "AlcoholIntake": 0.0 }),
            ))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["phase"], "debouncing");
        assert_eq!(json["display"]["source"], "heuristic");

        tokio::time::sleep(Duration::from_millis(500)).await;
        let json = body_json(app.clone().oneshot(get_req("/api/scenario")).await.unwrap()).await;
        assert_eq!(json["phase"], "settled");
        assert_eq!(json["display"]["percent"], "18.0%");

        let applied = body_json(
            app.clone()
                .oneshot(empty_req(Method::POST, "/api/scenario/apply"))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(applied["AlcoholIntake"], "0");

        let reset = body_json(
            app.oneshot(empty_req(Method::POST, "/api/scenario/reset"))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(reset["display"]["percent"], "42.0%");
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_scenario_edit_returns_422() {
        let mock = Arc::new(MockPredictor::new(0.42));
        let (app, _) = test_app(mock.clone());
        app.clone()
            .oneshot(json_req(Method::POST, "/api/assess", sample_form_json()))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(json_req(
                Method::PUT,
                "/api/scenario",
                serde_json::json!({ "BMI": -500.0, "PhysicalActivity": 99.0, "AlcoholIntake": -3.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_FAILED");

        tokio::time::sleep(Duration::from_millis(1000)).await;
        let json = body_json(app.oneshot(get_req("/api/scenario")).await.unwrap()).await;
        assert_eq!(json["phase"], "settled");
        assert_eq!(json["scenario"]["BMI"], 24.2);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn assess_ignores_typed_bmi() {
        let mock = Arc::new(MockPredictor::new(0.42));
        let (app, _) = test_app(mock.clone());
        let mut form = sample_form_json();
        form["BMI"] = "80".into();

        let response = app
            .oneshot(json_req(Method::POST, "/api/assess", form))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["payload"]["BMI"], 24.2);
        assert_eq!(mock.calls()[0].bmi, 24.2);
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_replace_takes_full_scenario() {
        let mock = Arc::new(MockPredictor::new(0.42));
        let (app, _) = test_app(mock.clone());
        app.clone()
            .oneshot(json_req(Method::POST, "/api/assess", sample_form_json()))
            .await
            .unwrap();

        let scenario = serde_json::json!({
            "BMI": 24.2, "Smoking": 1, "GeneticRisk": 2,
            "PhysicalActivity": 5.0, "AlcoholIntake": 2.5, "CancerHistory": 0
        });
        let response = app
            .oneshot(json_req(Method::POST, "/api/scenario", scenario))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["scenario"]["Smoking"], 1);
        assert_eq!(json["phase"], "debouncing");
    }

    #[tokio::test(start_paused = true)]
    async fn offline_scenario_uses_heuristic() {
        let mock = Arc::new(MockPredictor::new(0.42));
        let (app, _) = test_app(mock.clone());
        app.clone()
            .oneshot(json_req(Method::POST, "/api/assess", sample_form_json()))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(json_req(
                Method::PUT,
                "/api/connectivity",
                serde_json::json!({ "online": false }),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["online"], false);

        let json = body_json(
            app.oneshot(json_req(
                Method::PUT,
                "/api/scenario",
                serde_json::json!({ "Smoking": 1 }),
            ))
            .await
            .unwrap(),
        )
        .await;
        assert_eq!(json["phase"], "settled");
        assert_eq!(json["display"]["source"], "heuristic");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn history_endpoints() {
        let (app, _) = test_app(Arc::new(MockPredictor::new(0.42)));

        let response = app.clone().oneshot(get_req("/api/history/latest")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        app.clone()
            .oneshot(json_req(Method::POST, "/api/assess", sample_form_json()))
            .await
            .unwrap();

        let json = body_json(app.clone().oneshot(get_req("/api/history")).await.unwrap()).await;
        assert_eq!(json["total"], 1);
        assert_eq!(json["records"][0]["response"]["probability_cancer"], 0.42);

        let response = app.clone().oneshot(get_req("/api/history/latest")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("\"Age\": 50"));

        let response = app
            .clone()
            .oneshot(get_req("/api/history/export.csv"))
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"dss_history_"));
        assert_eq!(body_text(response).await.lines().count(), 2);

        let response = app
            .clone()
            .oneshot(empty_req(Method::DELETE, "/api/history"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["removed"], 1);

        let json = body_json(app.oneshot(get_req("/api/history")).await.unwrap()).await;
        assert_eq!(json["total"], 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_route_returns_404() {
        let (app, _) = test_app(Arc::new(MockPredictor::new(0.42)));
        let response = app.oneshot(get_req("/api/nonexistent")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
