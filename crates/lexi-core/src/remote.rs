use async_trait::async_trait;
use lexi_types::WordRecord;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),
}

/// Last-resort word source behind the local stores. The reference
/// deployment is a placeholder endpoint, so `Ok(None)` is a perfectly
/// normal answer.
#[async_trait]
pub trait RemoteWordSource: Send + Sync {
    async fn fetch_word(&self, word: &str) -> Result<Option<WordRecord>, RemoteError>;
}

pub struct HttpWordApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpWordApi {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl RemoteWordSource for HttpWordApi {
    async fn fetch_word(&self, word: &str) -> Result<Option<WordRecord>, RemoteError> {
        let url = format!("{}/words/{}", self.base_url.trim_end_matches('/'), word);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(RemoteError::Api(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let payload = response.json::<ApiWordPayload>().await?;
        Ok(Some(payload.into_record()))
    }
}

/// Remote responses carry a subset of the dictionary columns; missing
/// fields default to empty so they normalize into the same shape as
/// store rows.
#[derive(Deserialize)]
struct ApiWordPayload {
    word: String,
    #[serde(default)]
    phonetic: String,
    #[serde(default)]
    definition: String,
    #[serde(default)]
    translation: String,
    #[serde(default)]
    pos: String,
    #[serde(default)]
    collins: u8,
    #[serde(default)]
    oxford: bool,
    #[serde(default)]
    tag: String,
    #[serde(default)]
    bnc: u32,
    #[serde(default)]
    frq: u32,
    #[serde(default)]
    exchange: String,
}

impl ApiWordPayload {
    fn into_record(self) -> WordRecord {
        WordRecord {
            word_lower: self.word.to_lowercase(),
            word: self.word,
            phonetic: self.phonetic,
            definition: self.definition,
            translation: self.translation,
            pos: self.pos,
            collins: self.collins.min(5),
            oxford: self.oxford,
            tag: self.tag,
            bnc: self.bnc,
            frq: self.frq,
            exchange: self.exchange,
            detail: String::new(),
            audio: String::new(),
        }
    }
}
