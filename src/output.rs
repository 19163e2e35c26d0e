//! JSON response types and formatting for CLI output.

use memoria::Metadata;
use serde::Serialize;

/// Response for successful memory addition.
#[derive(Serialize)]
pub struct AddResponse {
    pub status: String,
    pub id: String,
}

/// Response for search results.
#[derive(Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
}

/// Individual search result item.
#[derive(Serialize)]
pub struct SearchResultItem {
    pub id: String,
    pub content: String,
    pub score: f32,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

/// Response for a forgotten memory.
#[derive(Serialize)]
pub struct ForgetResponse {
    pub status: String,
    pub id: String,
}

/// Bare status response, used by `clear`.
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct CountResponse {
    pub collection: String,
    pub count: usize,
}

/// Response for errors.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Print a value as formatted JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}
