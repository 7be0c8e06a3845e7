pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::advisory::handlers as advisory;
use crate::analytics::handlers as analytics;
use crate::matching::handlers as matching;
use crate::records::{admin, handlers as records};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Records
        .route(
            "/api/students",
            get(records::handle_list_students).post(records::handle_create_student),
        )
        .route("/api/students/branches", get(records::handle_student_branches))
        .route(
            "/api/students/:id",
            get(records::handle_get_student)
                .put(records::handle_update_student)
                .delete(records::handle_delete_student),
        )
        .route(
            "/api/companies",
            get(records::handle_list_companies).post(records::handle_create_company),
        )
        .route(
            "/api/companies/industries",
            get(records::handle_company_industries),
        )
        .route(
            "/api/companies/:id",
            get(records::handle_get_company)
                .put(records::handle_update_company)
                .delete(records::handle_delete_company),
        )
        .route(
            "/api/placements",
            get(records::handle_list_placements).post(records::handle_create_placement),
        )
        .route(
            "/api/placements/:id",
            get(records::handle_get_placement)
                .put(records::handle_update_placement)
                .delete(records::handle_delete_placement),
        )
        // Analytics
        .route("/api/analytics/stats", get(analytics::handle_stats))
        .route(
            "/api/analytics/placement-overview",
            get(analytics::handle_placement_overview),
        )
        .route(
            "/api/analytics/salary-distribution",
            get(analytics::handle_salary_distribution),
        )
        .route(
            "/api/analytics/branch-stats",
            get(analytics::handle_branch_stats),
        )
        .route(
            "/api/analytics/top-companies",
            get(analytics::handle_top_companies),
        )
        .route(
            "/api/analytics/cgpa-vs-package",
            get(analytics::handle_cgpa_vs_package),
        )
        .route("/api/analytics/top-skills", get(analytics::handle_top_skills))
        .route(
            "/api/analytics/monthly-trends",
            get(analytics::handle_monthly_trends),
        )
        .route(
            "/api/analytics/gender-distribution",
            get(analytics::handle_gender_distribution),
        )
        // Matching
        .route(
            "/api/jobs/recommendations/:student_id",
            get(matching::handle_recommendations),
        )
        // Advisory
        .route("/api/ai/analyze-resume", post(advisory::handle_analyze_resume))
        .route("/api/ai/skill-gap", post(advisory::handle_skill_gap))
        .route("/api/ai/predict-salary", post(advisory::handle_predict_salary))
        .route("/api/ai/roadmap", post(advisory::handle_roadmap))
        .route("/api/ai/chat", post(advisory::handle_chat))
        .route("/api/config", get(advisory::handle_advisor_config))
        // Admin
        .route(
            "/api/admin/export/students",
            get(admin::handle_export_students),
        )
        .route(
            "/api/admin/export/placements",
            get(admin::handle_export_placements),
        )
        .route("/api/admin/stats", get(admin::handle_admin_stats))
        .route(
            "/api/admin/reset-database",
            post(admin::handle_reset_database),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::store::memory::MemoryStore;

    fn test_state() -> AppState {
        AppState {
            store: Arc::new(MemoryStore::new()),
            llm: None,
            config: Config {
                database_url: None,
                advisor_api_key: None,
                advisor_model: "test-model".to_string(),
                advisor_api_url: "http://127.0.0.1:9".to_string(),
                port: 0,
                rust_log: "info".to_string(),
            },
        }
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    async fn create_student(app: &Router, name: &str, email: &str, skills: Value) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/students",
            Some(json!({
                "name": name,
                "email": email,
                "branch": "Computer Science",
                "cgpa": 8.8,
                "skills": skills,
                "gender": "Female"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }

    async fn create_company(app: &Router, name: &str, requirements: Value) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/companies",
            Some(json!({
                "name": name,
                "industry": "IT Services",
                "min_package": 6.0,
                "max_package": 12.0,
                "requirements": requirements
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_reports_service() {
        let app = build_router(test_state());
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "placement-api");
    }

    #[tokio::test]
    async fn confirmed_placement_drives_placed_flag_and_stats() {
        let app = build_router(test_state());
        let student = create_student(&app, "Asha", "asha@college.edu", json!(["Python"])).await;
        let company = create_company(&app, "Acme", json!(["Python"])).await;

        let (status, placement) = send(
            &app,
            Method::POST,
            "/api/placements",
            Some(json!({
                "student_id": student,
                "company_id": company,
                "role": "SDE",
                "package": 10.0
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{placement}");
        assert_eq!(placement["status"], "confirmed");

        let (_, fetched) = send(&app, Method::GET, &format!("/api/students/{student}"), None).await;
        assert_eq!(fetched["placed"], true);

        let (_, stats) = send(&app, Method::GET, "/api/analytics/stats", None).await;
        assert_eq!(stats["total_students"], 1);
        assert_eq!(stats["placed_students"], 1);
        assert_eq!(stats["placement_rate"], 100.0);
        assert_eq!(stats["avg_package"], 10.0);

        let placement_id = placement["id"].as_str().unwrap();
        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/api/placements/{placement_id}"),
            Some(json!({ "status": "rejected" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, fetched) = send(&app, Method::GET, &format!("/api/students/{student}"), None).await;
        assert_eq!(fetched["placed"], false);
    }

    #[tokio::test]
    async fn placement_for_missing_student_is_not_found() {
        let app = build_router(test_state());
        let company = create_company(&app, "Acme", json!([])).await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/placements",
            Some(json!({
                "student_id": uuid::Uuid::new_v4().to_string(),
                "company_id": company,
                "role": "SDE",
                "package": 10.0
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn malformed_id_is_bad_request_not_missing() {
        let app = build_router(test_state());
        let (status, body) = send(&app, Method::GET, "/api/students/xyz", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_ID");

        let (status, body) = send(&app, Method::GET, "/api/jobs/recommendations/xyz", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_ID");

        let missing = uuid::Uuid::new_v4();
        let (status, _) = send(
            &app,
            Method::GET,
            &format!("/api/jobs/recommendations/{missing}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_payloads_are_validation_errors() {
        let app = build_router(test_state());
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/students",
            Some(json!({ "name": "Asha", "email": "no-at-sign", "branch": "CS" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let student = create_student(&app, "Asha", "asha@college.edu", json!([])).await;
        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/api/students/{student}"),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let company = create_company(&app, "Acme", json!([])).await;
        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/companies/{company}"),
            Some(json!({ "min_package": 20.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("min_package"));
    }

    #[tokio::test]
    async fn student_list_paginates() {
        let app = build_router(test_state());
        for i in 0..5 {
            create_student(&app, &format!("Student {i}"), &format!("s{i}@college.edu"), json!([]))
                .await;
        }
        let (status, body) = send(&app, Method::GET, "/api/students?page=2&per_page=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 5);
        assert_eq!(body["pages"], 3);
        assert_eq!(body["current_page"], 2);
        let names: Vec<&str> = body["students"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Student 2", "Student 3"]);
    }

    #[tokio::test]
    async fn recommendations_are_bounded_and_ranked() {
        let app = build_router(test_state());
        let student = create_student(&app, "Asha", "asha@college.edu", json!(["Python", "SQL"])).await;
        for i in 0..7 {
            create_company(&app, &format!("Company {i}"), json!(["python", "sql", "docker"])).await;
        }

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/jobs/recommendations/{student}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let matches = body["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 5);
        let scores: Vec<u64> = matches
            .iter()
            .map(|m| m["match_score"].as_u64().unwrap())
            .collect();
        assert!(scores.iter().all(|s| (30..=98).contains(s)));
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn advisory_endpoints_fall_back_without_key() {
        let app = build_router(test_state());

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/ai/predict-salary",
            Some(json!({ "cgpa": 8.0, "skills": ["a", "b", "c", "d"], "projects": 3, "internships": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["predicted_avg_lpa"], 9.1);
        assert_eq!(body["confidence"], "low");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/ai/skill-gap",
            Some(json!({ "target_role": "Web Developer", "skills": ["html", "css"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["match_percentage"], 25);

        let (status, _) = send(&app, Method::POST, "/api/ai/skill-gap", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/ai/chat",
            Some(json!({ "message": "How do I prepare?" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["response"].as_str().unwrap().contains("placement assistant"));

        let (status, _) = send(&app, Method::POST, "/api/ai/analyze-resume", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, Method::GET, "/api/config", None).await;
        assert_eq!(body["advisor_configured"], false);
        assert_eq!(body["advisor_key_masked"], "Not Configured");
    }

    #[tokio::test]
    async fn roadmap_uses_stored_student() {
        let app = build_router(test_state());
        let student = create_student(&app, "Asha", "asha@college.edu", json!(["Python"])).await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/ai/roadmap",
            Some(json!({ "student_id": student, "career_goal": "Data Scientist" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["career_goal"], "Data Scientist");
        assert_eq!(body["months"].as_array().unwrap().len(), 6);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/ai/roadmap",
            Some(json!({ "student_id": "bogus" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn admin_export_reset_and_stats() {
        let app = build_router(test_state());
        create_student(&app, "Asha", "asha@college.edu", json!(["Python", "SQL"])).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/admin/export/students")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("\"Python, SQL\""));

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/admin/reset-database",
            Some(json!({ "confirm": false })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, stats) = send(&app, Method::GET, "/api/admin/stats", None).await;
        assert_eq!(stats["total_students"], 1);
        assert_eq!(stats["branches"], json!(["Computer Science"]));

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/admin/reset-database",
            Some(json!({ "confirm": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, stats) = send(&app, Method::GET, "/api/admin/stats", None).await;
        assert_eq!(stats["total_students"], 0);
    }

    #[tokio::test]
    async fn analytics_on_empty_store_is_all_zero() {
        let app = build_router(test_state());
        let (status, stats) = send(&app, Method::GET, "/api/analytics/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["placement_rate"], 0.0);
        assert_eq!(stats["highest_package"], 0.0);

        let (_, series) = send(&app, Method::GET, "/api/analytics/salary-distribution", None).await;
        assert_eq!(series["labels"].as_array().unwrap().len(), 6);
        assert!(series["values"].as_array().unwrap().iter().all(|v| v == 0));
    }
}
