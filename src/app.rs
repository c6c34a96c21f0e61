// src/app.rs

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::auth::auth_guard,
};

pub fn build_router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Colégios: a listagem é pública (o formulário de matrícula precisa dela
    // antes do login); criação e edição são de admin
    let school_routes = Router::new()
        .route("/", get(handlers::schools::list_schools))
        .merge(
            Router::new()
                .route("/", post(handlers::schools::create_school))
                .route("/{id}", patch(handlers::schools::update_school))
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_guard,
                )),
        );

    // Matrículas: o envio é público, a revisão é de admin
    let registration_routes = Router::new()
        .route("/", post(handlers::registrations::submit_registration))
        .merge(
            Router::new()
                .route("/", get(handlers::registrations::list_registrations))
                .route("/{id}", get(handlers::registrations::get_registration))
                .route(
                    "/{id}/status",
                    patch(handlers::registrations::update_registration_status),
                )
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_guard,
                )),
        );

    // Pagamentos: checkout e webhooks são públicos (os provedores não têm
    // token nosso); consulta exige sessão
    let payment_routes = Router::new()
        .route("/checkout", post(handlers::payments::checkout))
        .route("/webhooks/stripe", post(handlers::payments::stripe_webhook))
        .route("/webhooks/wompi", post(handlers::payments::wompi_webhook))
        .merge(
            Router::new()
                .route("/", get(handlers::payments::list_payments))
                .route("/{id}", get(handlers::payments::get_payment))
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_guard,
                )),
        );

    let admin_routes = Router::new()
        .route("/stats", get(handlers::dashboard::get_stats))
        .route(
            "/registrations",
            get(handlers::dashboard::admin_list_registrations),
        )
        .route(
            "/registrations/{id}",
            get(handlers::dashboard::admin_get_registration),
        )
        .route(
            "/registrations/{id}/status",
            patch(handlers::dashboard::admin_update_registration_status),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let user_routes = Router::new()
        .route("/"
               ,get(handlers::users::list_users)
               .post(handlers::users::create_user)
        )
        .route("/{id}"
               ,patch(handlers::users::update_user)
               .delete(handlers::users::delete_user)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let assignment_routes = Router::new()
        .route("/"
               ,post(handlers::assignments::map_roster)
               .get(handlers::assignments::list_rosters)
        )
        .route("/mine", get(handlers::assignments::my_rosters))
        .route("/graded", post(handlers::assignments::create_graded))
        .route("/{id}"
               ,get(handlers::assignments::get_assignment)
               .delete(handlers::assignments::delete_assignment)
        )
        .route("/{id}/submit", post(handlers::assignments::submit_assignment))
        .route("/{id}/grade", patch(handlers::assignments::grade_assignment))
        .route(
            "/{id}/student/{student_id}",
            delete(handlers::assignments::unassign_student),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let profile_routes = Router::new()
        .route("/me"
               ,get(handlers::profile::get_me)
               .patch(handlers::profile::update_me)
        )
        .route(
            "/student/registration",
            get(handlers::profile::student_registration),
        )
        .route(
            "/student/assignments",
            get(handlers::profile::student_assignments),
        )
        .route(
            "/teacher/assignments",
            get(handlers::profile::teacher_assignments),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let content_routes = Router::new()
        .route("/"
               ,get(handlers::contents::list_contents)
               .post(handlers::contents::create_content)
        )
        .route("/{id}", delete(handlers::contents::delete_content))
        .route("/{id}/publish", post(handlers::contents::publish_content))
        .route(
            "/{id}/request-approval",
            post(handlers::contents::request_content_approval),
        )
        .route("/{id}/approve", post(handlers::contents::approve_content))
        .route("/{id}/reject", post(handlers::contents::reject_content))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let task_routes = Router::new()
        .route("/"
               ,get(handlers::tasks::list_tasks)
               .post(handlers::tasks::create_task)
        )
        .route("/{id}", delete(handlers::tasks::delete_task))
        .route("/{id}/publish", post(handlers::tasks::publish_task))
        .route("/{id}/close", post(handlers::tasks::close_task))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // O front roda em outra origem e manda o token via header; credentials
    // ligado exige lista explícita de origens
    let origins: Vec<HeaderValue> = app_state
        .env
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/schools", school_routes)
        .nest("/api/registrations", registration_routes)
        .nest("/api/payments", payment_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/users", user_routes)
        .nest("/api/assignments", assignment_routes)
        .nest("/api/profile", profile_routes)
        .nest("/api/contents", content_routes)
        .nest("/api/tasks", task_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use sqlx::PgPool;
    use tower::ServiceExt;

    use crate::config::Env;

    // Pool preguiçoso: nenhum teste daqui chega a tocar o banco
    fn test_state() -> AppState {
        let env = Env {
            port: 0,
            database_url: "postgres://localhost:5432/plataforma_test".to_string(),
            jwt_secret: "segredo-de-teste".to_string(),
            token_expires_in_days: 7,
            cors_origins: vec!["http://localhost:3000".to_string()],
            stripe_secret_key: None,
            stripe_webhook_secret: None,
            wompi_webhook_secret: None,
            public_url: "http://localhost:3000".to_string(),
        };
        let pool = PgPool::connect_lazy(&env.database_url).expect("pool preguiçoso");
        AppState::assemble(env, pool).expect("estado de teste")
    }

    #[tokio::test]
    async fn health_responds_ok() {
        let app = build_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_route_without_token_is_unauthorized() {
        let app = build_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let app = build_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/admin/stats")
                    .header("Authorization", "Bearer nao-e-um-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = build_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/no-existe")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn stripe_webhook_without_keys_is_bad_request() {
        let app = build_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/payments/webhooks/stripe")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn wompi_webhook_without_keys_is_bad_request() {
        let app = build_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/payments/webhooks/wompi")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
