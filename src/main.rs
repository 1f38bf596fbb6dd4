mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::answers::{routes as answers_routes, AnswerService};
use crate::features::auth::JwtValidator;
use crate::features::categories::{routes as categories_routes, CategoryResolver, CategoryService};
use crate::features::questions::{
    routes as questions_routes, AssociationManager, QuestionService, QuestionTagService,
    TagReconciler,
};
use crate::features::users::{routes as users_routes, UserService};
use crate::modules::store::{PgTagStore, TagStore};
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Initialize auth
    let jwt_validator = Arc::new(JwtValidator::new(&config.auth));
    tracing::info!("Auth configuration initialized");

    // Tagging core
    let tag_store: Arc<dyn TagStore> = Arc::new(PgTagStore::new(pool.clone()));
    let category_resolver = CategoryResolver::new(Arc::clone(&tag_store));
    let association_manager = AssociationManager::new(Arc::clone(&tag_store));
    let tag_reconciler = TagReconciler::new(Arc::clone(&tag_store), category_resolver.clone());
    tracing::info!("Tag store initialized");

    let category_service = Arc::new(CategoryService::new(
        Arc::clone(&tag_store),
        category_resolver,
    ));
    tracing::info!("Category service initialized");

    let question_tag_service = Arc::new(QuestionTagService::new(
        Arc::clone(&tag_store),
        association_manager.clone(),
        tag_reconciler.clone(),
    ));
    let question_service = Arc::new(QuestionService::new(
        pool.clone(),
        association_manager,
        tag_reconciler,
        config.questions.require_owner,
    ));
    tracing::info!(
        "Question services initialized (require_owner={})",
        config.questions.require_owner
    );

    let user_service = Arc::new(UserService::new(pool.clone()));
    tracing::info!("User service initialized");

    let answer_service = Arc::new(AnswerService::new(pool.clone()));
    tracing::info!("Answer service initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn_with_state(
                Arc::new(credentials),
                middleware::basic_auth_middleware,
            ))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Question writes: authenticated when owners are required, otherwise a
    // token is optional and only used to record the owner.
    let question_write_routes = Router::new()
        .merge(questions_routes::write_routes(Arc::clone(&question_service)))
        .merge(questions_routes::tag_write_routes(Arc::clone(
            &question_tag_service,
        )));
    let question_write_routes = if config.questions.require_owner {
        question_write_routes.route_layer(from_fn_with_state(
            jwt_validator.clone(),
            middleware::auth_middleware,
        ))
    } else {
        question_write_routes.route_layer(from_fn_with_state(
            jwt_validator.clone(),
            middleware::optional_auth_middleware,
        ))
    };

    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(users_routes::protected_routes(Arc::clone(&user_service)))
        .merge(answers_routes::protected_routes(Arc::clone(&answer_service)))
        .route_layer(from_fn_with_state(
            jwt_validator.clone(),
            middleware::auth_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> StatusCode {
        StatusCode::OK
    }
    async fn it_works() -> &'static str {
        "It works!"
    }
    let health_route = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/api", axum::routing::get(it_works));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(questions_routes::routes(question_service))
        .merge(questions_routes::tag_routes(question_tag_service))
        .merge(categories_routes::routes(category_service))
        .merge(users_routes::routes(user_service))
        .merge(answers_routes::routes(answer_service));

    let app = Router::new()
        .merge(swagger)
        .merge(question_write_routes)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        .layer(
            ServiceBuilder::new()
                // Generate X-Request-Id using UUID v7 (or use client-provided one)
                .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(middleware::MakeSpanWithRequestId)
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                // Propagate X-Request-Id to response headers
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(middleware::cors_layer(
                    config.app.cors_allowed_origins.clone(),
                ))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    config.app.request_timeout,
                ))
                .layer(DefaultBodyLimit::max(config.app.max_request_body_size)),
        );

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
