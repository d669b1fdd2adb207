//! Builders for embeddings and records used across unit and integration tests.

use crate::cache::{EnrollmentInfo, EnrollmentRecord};
use crate::constants::{DEFAULT_NOEL_EMOJI, EMBEDDING_DIM};
use crate::embedding::EmbeddingVector;

/// All-zero embedding except `values[index] = value`.
pub fn embedding_at(index: usize, value: f64) -> EmbeddingVector {
    let mut values = vec![0.0; EMBEDDING_DIM];
    values[index] = value;
    EmbeddingVector::new(values).expect("fixture embedding is valid")
}

/// Embedding with every component set to `value`.
pub fn embedding_filled(value: f64) -> EmbeddingVector {
    EmbeddingVector::new(vec![value; EMBEDDING_DIM]).expect("fixture embedding is valid")
}

/// `base` shifted by `delta` along component `index`, so its distance to `base` is `|delta|`.
pub fn offset(base: &EmbeddingVector, index: usize, delta: f64) -> EmbeddingVector {
    let mut values = base.as_slice().to_vec();
    values[index] += delta;
    EmbeddingVector::new(values).expect("fixture embedding is valid")
}

pub fn info(id: &str, name: &str) -> EnrollmentInfo {
    EnrollmentInfo {
        id: id.to_string(),
        name: name.to_string(),
        noel_emoji: DEFAULT_NOEL_EMOJI.to_string(),
        avatar_url: format!("https://avatars.test/{id}.jpg"),
    }
}

pub fn record(id: &str, name: &str, embedding: EmbeddingVector) -> EnrollmentRecord {
    EnrollmentRecord::new(info(id, name), embedding)
}

/// Serves `router` on an ephemeral localhost port and returns its base URL.
#[cfg(test)]
pub(crate) async fn serve_stub(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub listener address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}
