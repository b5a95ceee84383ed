use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub mod error;
pub mod routes;
pub mod scheduler;
pub mod state;

use scheduler::TurnScheduler;
use shared::repositories::answer_repository::DynamoDbAnswerRepository;
use shared::repositories::game_repository::DynamoDbGameRepository;
use shared::repositories::match_repository::DynamoDbMatchRepository;
use shared::repositories::question_repository::DynamoDbQuestionRepository;
use shared::services::answer_evaluator::AnswerEvaluator;
use shared::services::game_service::GameService;
use shared::services::match_service::MatchService;
use shared::services::question_service::QuestionService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    // Set up repositories and services
    let config = aws_config::load_from_env().await;
    let client = aws_sdk_dynamodb::Client::new(&config);

    let match_repository = Arc::new(DynamoDbMatchRepository::new(client.clone()));
    let game_repository = Arc::new(DynamoDbGameRepository::new(client.clone()));
    let answer_repository = Arc::new(DynamoDbAnswerRepository::new(client.clone()));
    let question_repository = Arc::new(DynamoDbQuestionRepository::new(client.clone()));

    let game_service = GameService::new(
        game_repository.clone(),
        AnswerEvaluator::new(answer_repository.clone()),
    );
    let question_service = QuestionService::new(question_repository, answer_repository);
    let match_service = Arc::new(MatchService::new(
        match_repository,
        game_repository,
        game_service.clone(),
        question_service,
    ));
    let game_service = Arc::new(game_service);

    let scheduler = Arc::new(TurnScheduler::new(
        game_service.clone(),
        match_service.clone(),
    ));

    let app_state = state::AppState {
        match_service,
        game_service,
        scheduler,
    };

    // Configure CORS
    // ToDo: Tighten this up
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Merge routes
    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::matches::routes())
        .merge(routes::games::routes())
        .merge(routes::practice::routes())
        .layer(cors)
        .with_state(app_state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!(%port, "Listening");

    axum::serve(listener, app).await?;

    Ok(())
}
