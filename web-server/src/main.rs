use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use sectiongen::{
    DatabaseConfig, DatabaseManager, SectionGenerator, SectionItem, SectionStore, SectionsError,
    StoredSectionRecord,
};

// Application state
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<SectionGenerator>,
}

// API types
#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateSectionsRequest {
    /// Prompt describing the website idea, e.g. "landing page for a bakery"
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveSectionsRequest {
    pub prompt: String,
    pub sections: Vec<SectionItemRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionItemRequest {
    pub name: String,
    pub code: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("sectiongen=info,sectiongen_web_server=info,tower_http=debug")
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Database connection + schema
    let db = DatabaseManager::new(DatabaseConfig::default()).await?;
    db.ensure_schema().await?;

    let store: Arc<dyn SectionStore> = Arc::new(db.section_repository());
    let generator = Arc::new(SectionGenerator::from_env(store));

    let app_state = AppState { generator };
    let app = create_router(app_state);

    // Determine port
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .unwrap_or(3000);

    let addr = format!("0.0.0.0:{}", port);
    info!("Starting server on {}", addr);
    info!("POST   /sections       generate sections from a prompt");
    info!("POST   /sections/save  save caller-supplied sections");
    info!("GET    /sections       list stored records");
    info!("GET    /health         liveness probe");

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/sections", post(generate_sections).get(list_sections))
        .route("/sections/save", post(save_sections))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

// Health check endpoint
async fn health_check() -> Json<ApiResponse<String>> {
    Json(ApiResponse::ok("OK".to_string()))
}

// Generate sections from a prompt via the model
async fn generate_sections(
    State(state): State<AppState>,
    Json(request): Json<CreateSectionsRequest>,
) -> (StatusCode, Json<ApiResponse<StoredSectionRecord>>) {
    if let Err(message) = validate_create(&request) {
        return (StatusCode::BAD_REQUEST, Json(ApiResponse::err(message)));
    }

    match state.generator.generate(request.prompt.trim()).await {
        Ok(record) => (StatusCode::CREATED, Json(ApiResponse::ok(record))),
        Err(err) => {
            warn!("Failed to generate sections: {err}");
            (status_for(&err), Json(ApiResponse::err(err.to_string())))
        }
    }
}

// Save caller-supplied sections
async fn save_sections(
    State(state): State<AppState>,
    Json(request): Json<SaveSectionsRequest>,
) -> (StatusCode, Json<ApiResponse<StoredSectionRecord>>) {
    if let Err(message) = validate_save(&request) {
        return (StatusCode::BAD_REQUEST, Json(ApiResponse::err(message)));
    }

    let sections: Vec<SectionItem> = request
        .sections
        .into_iter()
        .map(|s| SectionItem {
            name: s.name,
            code: s.code,
        })
        .collect();

    match state.generator.save(request.prompt.trim(), &sections).await {
        Ok(record) => (StatusCode::CREATED, Json(ApiResponse::ok(record))),
        Err(err) => {
            warn!("Failed to save sections: {err}");
            (status_for(&err), Json(ApiResponse::err(err.to_string())))
        }
    }
}

// List all stored records
async fn list_sections(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<StoredSectionRecord>>>) {
    match state.generator.list().await {
        Ok(records) => (StatusCode::OK, Json(ApiResponse::ok(records))),
        Err(err) => {
            warn!("Failed to list sections: {err}");
            (status_for(&err), Json(ApiResponse::err(err.to_string())))
        }
    }
}

fn validate_create(request: &CreateSectionsRequest) -> Result<(), String> {
    if request.prompt.trim().is_empty() {
        return Err("prompt must not be empty".to_string());
    }
    Ok(())
}

fn validate_save(request: &SaveSectionsRequest) -> Result<(), String> {
    if request.prompt.trim().is_empty() {
        return Err("prompt must not be empty".to_string());
    }
    if request.sections.is_empty() {
        return Err("sections must not be empty".to_string());
    }
    for (index, section) in request.sections.iter().enumerate() {
        if section.name.trim().is_empty() {
            return Err(format!("sections[{index}].name must not be empty"));
        }
        if section.code.trim().is_empty() {
            return Err(format!("sections[{index}].code must not be empty"));
        }
    }
    Ok(())
}

fn status_for(err: &SectionsError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_rejects_unknown_fields() {
        let result: Result<CreateSectionsRequest, _> =
            serde_json::from_str(r#"{"prompt": "bakery", "extra": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_create_rejects_blank_prompt() {
        let request = CreateSectionsRequest {
            prompt: "   ".to_string(),
        };
        assert!(validate_create(&request).is_err());
    }

    #[test]
    fn test_validate_save_rejects_empty_array() {
        let request = SaveSectionsRequest {
            prompt: "bakery".to_string(),
            sections: vec![],
        };
        assert!(validate_save(&request).is_err());
    }

    #[test]
    fn test_validate_save_rejects_blank_member_fields() {
        let request = SaveSectionsRequest {
            prompt: "bakery".to_string(),
            sections: vec![SectionItemRequest {
                name: "Hero".to_string(),
                code: " ".to_string(),
            }],
        };
        let message = validate_save(&request).unwrap_err();
        assert!(message.contains("sections[0].code"));
    }

    #[test]
    fn test_validate_save_accepts_well_formed_request() {
        let request: SaveSectionsRequest = serde_json::from_str(
            r#"{"prompt": "bakery", "sections": [{"name": "Hero", "code": "<section>A</section>"}]}"#,
        )
        .unwrap();
        assert!(validate_save(&request).is_ok());
    }

    #[test]
    fn test_client_errors_map_to_bad_request() {
        assert_eq!(
            status_for(&SectionsError::MissingApiKey),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&SectionsError::Generation(Box::new(
                SectionsError::EmptyCompletion
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
