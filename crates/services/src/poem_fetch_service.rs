//! Poem lookup through an OpenAI-compatible chat completions endpoint.
//!
//! A query either names a poem (the model is asked for its full text) or
//! points at a web page (the page is fetched, reduced to text and handed to
//! the model for extraction). Either way the reply must be a JSON object
//! `{title, author, lines}` and is validated before it becomes a `PoemDraft`.

use std::env;

use recite_core::model::{PoemDraft, PoemLookup, PoemQuery};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;

/// Page text past this many characters is dropped before prompting.
pub const MAX_PAGE_CHARS: usize = 30_000;

const SYSTEM_PROMPT: &str = "You extract poems from provided content and output valid JSON only. \
No commentary, no markdown. Output the poem exactly as it appears in the source material.";

const FORMAT_INSTRUCTIONS: &str = "Output the poem as a JSON object with keys \"title\" (string), \
\"author\" (string), and \"lines\" (array of strings, one per line, use \"\" for stanza breaks). \
Output ONLY the JSON.";

#[derive(Clone, Debug)]
pub struct PoemFetchConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl PoemFetchConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("POEM_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("POEM_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("POEM_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

#[derive(Clone)]
pub struct PoemFetchService {
    client: Client,
    config: Option<PoemFetchConfig>,
}

impl PoemFetchService {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(PoemFetchConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<PoemFetchConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Validate raw form input and look the poem up.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Query` without touching the network when neither a
    /// title nor a valid URL is given; otherwise see [`Self::fetch`].
    pub async fn fetch_from_input(
        &self,
        title: &str,
        author: &str,
        url: &str,
    ) -> Result<PoemDraft, FetchError> {
        let query = PoemQuery::new(title, author, url)?;
        self.fetch(&query).await
    }

    /// Retrieve a poem for `query`. A URL takes precedence over a title.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Disabled` when no API key is configured,
    /// `FetchError::HttpStatus`/`FetchError::Http` for transport failures,
    /// and `FetchError::EmptyResponse`, `FetchError::Json` or
    /// `FetchError::InvalidStructure` for unusable replies.
    pub async fn fetch(&self, query: &PoemQuery) -> Result<PoemDraft, FetchError> {
        let result = self.lookup(query).await;
        match &result {
            Ok(draft) => tracing::info!(
                title = %draft.title,
                lines = draft.lines.len(),
                "poem retrieved"
            ),
            Err(err) => tracing::warn!(error = %err, "poem lookup failed"),
        }
        result
    }

    async fn lookup(&self, query: &PoemQuery) -> Result<PoemDraft, FetchError> {
        let config = self.config.as_ref().ok_or(FetchError::Disabled)?;

        let prompt = match query.lookup() {
            PoemLookup::Url(url) => {
                tracing::info!(%url, "fetching poem page");
                let page = self.fetch_page(url).await?;
                format!(
                    "Extract the poem from this web page. The poem text is in the page \
                     content; find it and return all lines.\n\n{page}"
                )
            }
            PoemLookup::Title { title, author } => {
                tracing::info!(title, author, "looking up poem by title");
                title_prompt(title, author)
            }
        };

        let reply = self.complete(config, &prompt).await?;
        parse_poem_reply(&reply)
    }

    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status()));
        }
        let html = response.text().await?;
        let text = html2md::parse_html(&html);
        Ok(truncate_chars(&text, MAX_PAGE_CHARS).to_string())
    }

    async fn complete(&self, config: &PoemFetchConfig, prompt: &str) -> Result<String, FetchError> {
        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("{prompt}\n\n{FORMAT_INSTRUCTIONS}"),
                },
            ],
            temperature: 0.0,
            max_tokens: 2048,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(FetchError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

fn title_prompt(title: &str, author: Option<&str>) -> String {
    let by = author.map(|a| format!(" by {a}")).unwrap_or_default();
    format!("Give the full text of the poem \"{title}\"{by}. Include every line of the complete poem.")
}

/// Cut `text` to at most `max` characters without splitting a character.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> &str {
    text.char_indices()
        .nth(max)
        .map_or(text, |(end, _)| &text[..end])
}

/// Strip Markdown code fences and restore a missing leading brace.
fn normalize_reply(raw: &str) -> String {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.strip_prefix("json").unwrap_or(rest);
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    let text = text.trim();
    if text.starts_with('{') {
        text.to_string()
    } else {
        format!("{{{text}")
    }
}

/// Parse a model reply into a draft, checking the `{title, author, lines}` shape.
///
/// # Errors
///
/// Returns `FetchError::Json` for unparsable text and
/// `FetchError::InvalidStructure` for missing or mistyped keys.
pub fn parse_poem_reply(raw: &str) -> Result<PoemDraft, FetchError> {
    let value: Value = serde_json::from_str(&normalize_reply(raw))?;
    let Value::Object(map) = value else {
        return Err(FetchError::InvalidStructure("expected a JSON object".into()));
    };

    let text_field = |key: &str| -> Result<String, FetchError> {
        match map.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
            Some(_) => Err(FetchError::InvalidStructure(format!("`{key}` must be a non-empty string"))),
            None => Err(FetchError::InvalidStructure(format!("missing `{key}`"))),
        }
    };
    let title = text_field("title")?;
    let author = text_field("author")?;

    let lines = match map.get("lines") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(line) => Ok(line.clone()),
                _ => Err(FetchError::InvalidStructure("`lines` must hold only strings".into())),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(FetchError::InvalidStructure("`lines` must be an array".into())),
        None => return Err(FetchError::InvalidStructure("missing `lines`".into())),
    };

    Ok(PoemDraft::new(title, author, lines))
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
