//! Shared fixtures: an in-memory Chroma server and a deterministic provider.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use memoria::{ChromaClient, ChromaVectorStore, Embedding, EmbeddingProvider};
use serde_json::{Value, json};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Words the stub provider knows; each owns one dimension.
const VOCABULARY: &[&str] = &[
    "sky", "blue", "color", "rust", "language", "systems", "cat", "sleeps", "ocean", "water",
];

/// Bag-of-words embeddings over [`VOCABULARY`]. Unknown words are ignored.
#[derive(Default)]
pub struct StubProvider {
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn vector(text: &str) -> Embedding {
        let mut vector = vec![0.0; VOCABULARY.len()];
        for word in text.split_whitespace() {
            let word = word.to_lowercase();
            if let Some(index) = VOCABULARY.iter().position(|known| *known == word) {
                vector[index] += 1.0;
            }
        }
        vector
    }

    /// Number of texts embedded so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for StubProvider {
    async fn get_embedding(&self, text: &str) -> memoria::Result<Embedding> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::vector(text))
    }

    fn dimensions(&self) -> usize {
        VOCABULARY.len()
    }

    fn model_id(&self) -> &str {
        "stub/bag-of-words"
    }
}

#[derive(Debug, Clone)]
struct Record {
    id: String,
    embedding: Vec<f64>,
    document: Value,
    metadata: Value,
}

#[derive(Debug)]
struct FakeCollection {
    id: String,
    name: String,
    metadata: Value,
    configuration: Value,
    records: Vec<Record>,
}

impl FakeCollection {
    fn model(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "metadata": self.metadata,
            "configuration_json": self.configuration,
        })
    }
}

#[derive(Debug, Default)]
struct FakeState {
    collections: HashMap<String, FakeCollection>,
    created: usize,
}

/// Just enough of the Chroma v2 API to store and query records in memory.
#[derive(Clone, Default)]
pub struct FakeChroma {
    state: Arc<Mutex<FakeState>>,
}

impl FakeChroma {
    /// Start a server backed by a fresh fake.
    pub async fn start() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(FakeChroma::default())
            .mount(&server)
            .await;
        server
    }

    fn handle(&self, method: &str, segments: &[&str], body: Value) -> ResponseTemplate {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };

        match (method, segments) {
            ("GET", ["heartbeat"]) => ResponseTemplate::new(200).set_body_json(json!({
                "nanosecond heartbeat": 1
            })),
            ("POST", [.., "collections"]) => {
                let name = body["name"].as_str().unwrap_or_default().to_string();
                if !state.collections.contains_key(&name) {
                    state.created += 1;
                    let collection = FakeCollection {
                        id: format!("col-{}", state.created),
                        name: name.clone(),
                        metadata: body["metadata"].clone(),
                        configuration: body["configuration"].clone(),
                        records: Vec::new(),
                    };
                    state.collections.insert(name.clone(), collection);
                }
                ResponseTemplate::new(200).set_body_json(state.collections[&name].model())
            }
            ("GET", [.., "collections", name]) => match state.collections.get(*name) {
                Some(collection) => ResponseTemplate::new(200).set_body_json(collection.model()),
                None => not_found(name),
            },
            ("DELETE", [.., "collections", name]) => match state.collections.remove(*name) {
                Some(_) => ResponseTemplate::new(200).set_body_json(json!({})),
                None => not_found(name),
            },
            (_, [.., "collections", id, action]) => {
                let Some(collection) = state.collections.values_mut().find(|c| c.id == *id) else {
                    return not_found(id);
                };
                match (method, *action) {
                    ("POST", "add") => add(collection, &body),
                    ("POST", "query") => query(collection, &body),
                    ("POST", "delete") => delete(collection, &body),
                    ("GET", "count") => {
                        ResponseTemplate::new(200).set_body_json(json!(collection.records.len()))
                    }
                    _ => ResponseTemplate::new(404),
                }
            }
            _ => ResponseTemplate::new(404),
        }
    }
}

impl Respond for FakeChroma {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let path = request.url.path().trim_start_matches("/api/v2/").to_string();
        let segments: Vec<&str> = path.split('/').collect();
        let body = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        self.handle(request.method.as_str(), &segments, body)
    }
}

fn not_found(what: &str) -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "error": "NotFoundError",
        "message": format!("{what} does not exist"),
    }))
}

fn add(collection: &mut FakeCollection, body: &Value) -> ResponseTemplate {
    let ids = body["ids"].as_array().cloned().unwrap_or_default();
    for (i, id) in ids.iter().enumerate() {
        let embedding = body["embeddings"][i]
            .as_array()
            .map(|values| values.iter().filter_map(Value::as_f64).collect())
            .unwrap_or_default();
        collection.records.push(Record {
            id: id.as_str().unwrap_or_default().to_string(),
            embedding,
            document: body["documents"][i].clone(),
            metadata: body
                .get("metadatas")
                .map(|m| m[i].clone())
                .unwrap_or(Value::Null),
        });
    }
    ResponseTemplate::new(201).set_body_json(json!({}))
}

fn query(collection: &FakeCollection, body: &Value) -> ResponseTemplate {
    let n_results = body["n_results"].as_u64().unwrap_or(10) as usize;
    let queries = body["query_embeddings"].as_array().cloned().unwrap_or_default();

    let mut response = json!({
        "ids": [], "documents": [], "metadatas": [], "embeddings": [], "distances": []
    });
    for query in queries {
        let query: Vec<f64> = query
            .as_array()
            .map(|values| values.iter().filter_map(Value::as_f64).collect())
            .unwrap_or_default();
        let mut hits: Vec<(f64, &Record)> = collection
            .records
            .iter()
            .map(|record| (cosine_distance(&query, &record.embedding), record))
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.truncate(n_results);

        push(&mut response, "ids", hits.iter().map(|(_, r)| json!(r.id)));
        push(&mut response, "documents", hits.iter().map(|(_, r)| r.document.clone()));
        push(&mut response, "metadatas", hits.iter().map(|(_, r)| r.metadata.clone()));
        push(&mut response, "embeddings", hits.iter().map(|(_, r)| json!(r.embedding)));
        push(&mut response, "distances", hits.iter().map(|(d, _)| json!(d)));
    }
    ResponseTemplate::new(200).set_body_json(response)
}

fn push(response: &mut Value, field: &str, row: impl Iterator<Item = Value>) {
    if let Some(rows) = response[field].as_array_mut() {
        rows.push(Value::Array(row.collect()));
    }
}

fn delete(collection: &mut FakeCollection, body: &Value) -> ResponseTemplate {
    let ids: Vec<&str> = body["ids"]
        .as_array()
        .map(|ids| ids.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    collection.records.retain(|record| !ids.contains(&record.id.as_str()));
    ResponseTemplate::new(200).set_body_json(json!({}))
}

fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

/// Store over `server` using a fresh stub provider, which is also returned.
pub fn store(server: &MockServer, collection: &str) -> (ChromaVectorStore, Arc<StubProvider>) {
    let provider = Arc::new(StubProvider::default());
    let store = ChromaVectorStore::new(
        provider.clone(),
        ChromaClient::new(server.uri()),
        collection,
    );
    (store, provider)
}

/// Requests received so far whose method and path suffix match.
pub async fn requests_matching(server: &MockServer, method: &str, suffix: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == method && r.url.path().ends_with(suffix))
        .count()
}
