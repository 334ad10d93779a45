use crate::error::{EmbeddingError, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Default vector width of the E5-base family.
pub(crate) const DEFAULT_DIMENSION: usize = 768;

/// Which backend serves embeddings for this process.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum EmbeddingMode {
    Http,
    Stub,
}

impl EmbeddingMode {
    pub(crate) fn from_env() -> Result<Self> {
        let raw = env::var("TMEP_EMBEDDING_MODE")
            .unwrap_or_else(|_| "http".to_string())
            .to_ascii_lowercase();
        match raw.as_str() {
            "http" => Ok(Self::Http),
            "stub" => Ok(Self::Stub),
            other => Err(EmbeddingError::UnsupportedMode(other.to_string())),
        }
    }
}

pub(crate) enum Backend {
    Http(HttpBackend),
    Stub(StubBackend),
}

impl Backend {
    pub(crate) fn from_env() -> Result<Self> {
        match EmbeddingMode::from_env()? {
            EmbeddingMode::Http => Ok(Self::Http(HttpBackend::from_env()?)),
            EmbeddingMode::Stub => Ok(Self::Stub(StubBackend::new(DEFAULT_DIMENSION))),
        }
    }

    pub(crate) async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        match self {
            Self::Http(backend) => backend.embed(text).await,
            Self::Stub(backend) => Ok(backend.embed(text)),
        }
    }

    pub(crate) const fn dimension(&self) -> usize {
        match self {
            Self::Http(backend) => backend.dimension,
            Self::Stub(backend) => backend.dimension,
        }
    }
}

/// OpenAI-style `/embeddings` endpoint client.
pub(crate) struct HttpBackend {
    client: reqwest::Client,
    url: String,
    model: String,
    pub(crate) dimension: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

impl HttpBackend {
    fn from_env() -> Result<Self> {
        let url = env::var("TMEP_EMBEDDING_URL")
            .map_err(|_| EmbeddingError::MissingConfig("TMEP_EMBEDDING_URL".to_string()))?;
        let model =
            env::var("TMEP_EMBEDDING_MODEL").unwrap_or_else(|_| "intfloat/e5-base-v2".to_string());
        let dimension = env::var("TMEP_EMBEDDING_DIM")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_DIMENSION);

        Ok(Self {
            client: reqwest::Client::new(),
            url: url.trim_end_matches('/').to_string(),
            model,
            dimension,
        })
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingError::service(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(EmbeddingError::service(format!(
                "embedding service returned {}",
                response.status()
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::service(format!("malformed response: {e}")))?;

        body.data
            .into_iter()
            .next()
            .map(|item| item.embedding)
            .ok_or_else(|| EmbeddingError::service("missing embedding data"))
    }
}

/// Deterministic hashed backend for tests and offline pipeline runs.
/// Same text always maps to the same unit vector.
pub(crate) struct StubBackend {
    pub(crate) dimension: usize,
}

impl StubBackend {
    pub(crate) const fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub(crate) fn embed(&self, text: &str) -> Vec<f32> {
        stub_embed(text, self.dimension)
    }
}

pub(crate) fn stub_embed(text: &str, dimension: usize) -> Vec<f32> {
    let mut state =
        fnv1a_64(text.as_bytes()) ^ (dimension as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut vec = Vec::with_capacity(dimension);
    for _ in 0..dimension {
        let bits = splitmix64(&mut state);
        let high = (bits >> 32) as u32;
        let mantissa = high >> 9;
        let unit = f32::from_bits(0x3f80_0000 | mantissa) - 1.0;
        vec.push(unit.mul_add(2.0, -1.0));
    }
    normalize(&mut vec);
    vec
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn normalize(vec: &mut [f32]) {
    let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vec.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stub_embed_deterministic() {
        let a = stub_embed("query: likelihood of confusion", 32);
        let b = stub_embed("query: likelihood of confusion", 32);
        assert_eq!(a, b);
    }

    #[test]
    fn test_stub_embed_distinguishes_texts() {
        let a = stub_embed("one", 32);
        let b = stub_embed("two", 32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_stub_embed_unit_norm() {
        let v = stub_embed("anything", 64);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }
}
