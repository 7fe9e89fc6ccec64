use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use chrono::Utc;
use knowledge_service::handlers;
use knowledge_service::middleware::AuthMiddleware;
use knowledge_service::openapi::ApiDoc;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use std::collections::HashMap;
use std::io;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

struct HealthState {
    db_pool: sqlx::Pool<sqlx::Postgres>,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "lowercase")]
enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct ComponentCheck {
    status: ComponentStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    status: ComponentStatus,
    checks: HashMap<String, ComponentCheck>,
    timestamp: String,
}

impl HealthState {
    async fn check_postgres(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.db_pool)
            .await
            .map(|_| ())
    }
}

async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    match state.check_postgres().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "knowledge-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "knowledge-service"
        })),
    }
}

async fn readiness_summary(state: web::Data<HealthState>) -> HttpResponse {
    let mut checks = HashMap::new();
    let mut ready = true;

    let start = Instant::now();
    let pg_result = state.check_postgres().await;
    let pg_latency = Some(start.elapsed().as_millis() as u64);
    let postgres_check = match pg_result {
        Ok(_) => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: "PostgreSQL connection successful".to_string(),
            latency_ms: pg_latency,
        },
        Err(e) => {
            ready = false;
            ComponentCheck {
                status: ComponentStatus::Unhealthy,
                message: format!("PostgreSQL connection failed: {}", e),
                latency_ms: pg_latency,
            }
        }
    };
    checks.insert("postgresql".to_string(), postgres_check);

    let status = if ready {
        ComponentStatus::Healthy
    } else {
        ComponentStatus::Unhealthy
    };

    let response = ReadinessResponse {
        ready,
        status,
        checks,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

async fn openapi_json(doc: web::Data<utoipa::openapi::OpenApi>) -> actix_web::Result<HttpResponse> {
    let body = serde_json::to_string(&*doc).map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match knowledge_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting knowledge-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);
    if config.auth.jwt_secret.is_none() {
        tracing::warn!(
            "JWT secret not configured; bearer tokens will be ignored and requests treated as anonymous"
        );
    }

    // Initialize database connection pool
    let db_pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Connected to database");

    if config.database.run_migrations {
        if let Err(e) = sqlx::migrate!("./migrations").run(&db_pool).await {
            tracing::error!("Migration failed: {:#}", e);
            return Err(io::Error::new(io::ErrorKind::Other, e.to_string()));
        }
        tracing::info!("Migrations applied");
    }

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let health_state = web::Data::new(HealthState {
        db_pool: db_pool.clone(),
    });

    let server = HttpServer::new(move || {
        // Build CORS configuration
        let cors_builder = Cors::default();
        let mut cors = cors_builder;
        for origin in config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        let openapi_doc = ApiDoc::openapi();

        App::new()
            .app_data(web::Data::new(openapi_doc.clone()))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api/v1/openapi.json", openapi_doc.clone()),
            )
            .route("/api/v1/openapi.json", web::get().to(openapi_json))
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(
                "/metrics",
                web::get().to(knowledge_service::metrics::serve_metrics),
            )
            // Health check endpoints
            .route("/api/v1/health", web::get().to(health_summary))
            .route("/api/v1/health/ready", web::get().to(readiness_summary))
            .route("/api/v1/health/live", web::get().to(liveness_check))
            .route("/", web::get().to(handlers::render_index))
            .service(
                web::scope("/api/v1")
                    .wrap(AuthMiddleware::new(&config.auth))
                    .route("/feed", web::get().to(handlers::get_feed))
                    .route("/table", web::get().to(handlers::get_table))
                    .route("/cluster", web::get().to(handlers::get_cluster))
                    .route("/favorites", web::get().to(handlers::get_favorites))
                    .service(
                        web::scope("/index")
                            .route("/typeahead", web::get().to(handlers::post_typeahead))
                            .route("/typeahead/tags", web::get().to(handlers::tags_typeahead))
                            .route("/typeahead/users", web::get().to(handlers::users_typeahead))
                            .route("/typeahead/paths", web::get().to(handlers::paths_typeahead)),
                    )
                    .route("/create", web::get().to(handlers::editor_config))
                    .route(
                        "/templates/{format}",
                        web::get().to(handlers::download_template),
                    ),
            )
    })
    .bind(&bind_address)?
    .workers(4)
    .run();

    server.await?;

    tracing::info!("knowledge-service shutting down");

    Ok(())
}
