//! Client for the Gemini `generateContent` REST endpoint

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ContentProvider, ProviderError, Result, SourceLink, WebContext};
use crate::config::ProviderConfig;
use crate::vocab::models::{
    DailyResource, GeneratedContent, ResourceKind, SentenceDraft, TermDraft,
};

/// Gemini client
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

/// What a single request asks for besides the prompt
#[derive(Debug, Default)]
struct RequestOptions {
    /// JSON schema the reply must follow
    schema: Option<Value>,
    /// Let the model ground its answer with Google Search
    web_search: bool,
}

/// Text of the first candidate plus any grounding sources
#[derive(Debug, Default)]
struct Reply {
    text: String,
    links: Vec<SourceLink>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

/// Terms come back with a single `example`
#[derive(Debug, Deserialize)]
struct WireTerm {
    #[serde(default)]
    term_en: String,
    #[serde(default)]
    term_zh: String,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    example: Option<String>,
    #[serde(default)]
    examples: Vec<String>,
    #[serde(default)]
    category: Option<String>,
}

impl WireTerm {
    fn into_draft(self, topic: &str) -> Option<TermDraft> {
        if self.term_en.trim().is_empty() {
            return None;
        }
        let mut examples = self.examples;
        if let Some(example) = self.example.filter(|e| !e.trim().is_empty()) {
            examples.insert(0, example);
        }
        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| topic.to_string());
        Some(TermDraft {
            term_en: self.term_en,
            term_zh: self.term_zh,
            explanation: self.explanation,
            examples,
            category,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WireSentence {
    #[serde(default)]
    content: String,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireDailyContent {
    #[serde(default)]
    terms: Vec<WireTerm>,
    #[serde(default)]
    sentences: Vec<WireSentence>,
}

impl WireDailyContent {
    fn into_content(self, topic: &str) -> GeneratedContent {
        GeneratedContent {
            terms: self
                .terms
                .into_iter()
                .filter_map(|t| t.into_draft(topic))
                .collect(),
            sentences: self
                .sentences
                .into_iter()
                .filter(|s| !s.content.trim().is_empty())
                .map(|s| SentenceDraft {
                    content: s.content,
                    category: s
                        .category
                        .filter(|c| !c.trim().is_empty())
                        .unwrap_or_else(|| topic.to_string()),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireResource {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    summary: String,
}

impl WireResource {
    fn into_resource(self) -> Option<DailyResource> {
        if self.title.trim().is_empty() || !self.url.starts_with("http") {
            return None;
        }
        let kind = match self.kind.as_deref().map(str::to_lowercase).as_deref() {
            Some("podcast") => ResourceKind::Podcast,
            Some("video") => ResourceKind::Video,
            _ => ResourceKind::Blog,
        };
        Some(DailyResource {
            title: self.title,
            url: self.url,
            kind,
            summary: self.summary,
        })
    }
}

fn term_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "term_en": { "type": "STRING" },
            "term_zh": { "type": "STRING" },
            "explanation": { "type": "STRING" },
            "example": { "type": "STRING" },
            "category": { "type": "STRING" }
        },
        "required": ["term_en", "term_zh", "explanation", "example", "category"]
    })
}

fn daily_content_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "terms": { "type": "ARRAY", "items": term_schema() },
            "sentences": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "content": { "type": "STRING" },
                        "category": { "type": "STRING" }
                    }
                }
            }
        }
    })
}

fn build_request_body(prompt: &str, options: &RequestOptions) -> Value {
    let mut body = json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
    });
    if let Some(schema) = &options.schema {
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema
        });
    }
    if options.web_search {
        body["tools"] = json!([{ "google_search": {} }]);
    }
    body
}

fn extract_reply(response: GenerateResponse) -> Reply {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Reply::default();
    };

    let text = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let links = candidate
        .grounding_metadata
        .map(|m| {
            m.grounding_chunks
                .into_iter()
                .filter_map(|chunk| chunk.web)
                .filter_map(|web| {
                    web.uri.map(|url| SourceLink {
                        title: web.title.unwrap_or_else(|| "Source".to_string()),
                        url,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Reply { text, links }
}

/// Pull the JSON payload out of a reply, tolerating a Markdown code fence
fn json_payload(text: &str) -> &str {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("fence pattern is valid")
    });
    match fence.captures(text).and_then(|c| c.get(1)) {
        Some(m) => m.as_str(),
        None => text.trim(),
    }
}

fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T> {
    let payload = json_payload(text);
    if payload.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    Ok(serde_json::from_str(payload)?)
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ProviderError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate(&self, prompt: &str, options: RequestOptions) -> Result<Reply> {
        let body = build_request_body(prompt, &options);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let reply = extract_reply(parsed);
        log::debug!(
            "Gemini replied with {} chars and {} sources",
            reply.text.len(),
            reply.links.len()
        );
        Ok(reply)
    }
}

#[async_trait]
impl ContentProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_terms(&self, topic: &str, count: usize) -> Result<Vec<TermDraft>> {
        let prompt = format!(
            "Generate {} distinct, professional business English terms or idioms related to the topic: \"{}\".\n\
             Include Chinese translation, a simple explanation, and an example sentence.",
            count, topic
        );
        let options = RequestOptions {
            schema: Some(json!({ "type": "ARRAY", "items": term_schema() })),
            ..Default::default()
        };
        let reply = self.generate(&prompt, options).await?;
        let terms: Vec<WireTerm> = parse_json_reply(&reply.text)?;
        Ok(terms.into_iter().filter_map(|t| t.into_draft(topic)).collect())
    }

    async fn generate_daily_content(&self, topic: &str) -> Result<GeneratedContent> {
        let prompt = format!(
            "Create a mini-course for the business topic: \"{}\".\n\
             1. Generate 3 key Vocabulary Terms (English, Chinese, Explanation, Example).\n\
             2. Generate 2 useful Business Sentences (Content, Category e.g. Email/Meeting).\n\
             Return JSON.",
            topic
        );
        let options = RequestOptions {
            schema: Some(daily_content_schema()),
            ..Default::default()
        };
        let reply = self.generate(&prompt, options).await?;
        let content: WireDailyContent = parse_json_reply(&reply.text)?;
        Ok(content.into_content(topic))
    }

    async fn recommend_resource(&self, topic: &str) -> Result<Option<DailyResource>> {
        // Search grounding and a response schema cannot be combined, so the
        // JSON shape is spelled out in the prompt instead.
        let prompt = format!(
            "Find a highly-rated, professional Podcast episode OR YouTube video specifically about \"{}\" in a business context.\n\
             Prioritize content from top industry channels (e.g., HBR, TED, WSJ, specialized industry channels).\n\
             Reply with only a JSON object with the keys \"title\", \"url\", \"type\" (one of \"podcast\", \"video\", \"blog\") and \"summary\" (one short sentence).",
            topic
        );
        let options = RequestOptions {
            web_search: true,
            ..Default::default()
        };
        let reply = self.generate(&prompt, options).await?;
        let resource: Option<WireResource> = parse_json_reply(&reply.text)?;
        Ok(resource.and_then(WireResource::into_resource))
    }

    async fn explain_term(&self, term: &str) -> Result<String> {
        let prompt = format!(
            "Explain the business term \"{}\" simply for a non-expert in one short paragraph.",
            term
        );
        let reply = self.generate(&prompt, RequestOptions::default()).await?;
        let text = reply.text.trim();
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text.to_string())
    }

    async fn sentence_variations(&self, sentence: &str) -> Result<Vec<String>> {
        let prompt = format!(
            "Act as a business communication expert.\n\
             Rewrite the following business sentence in 2 different professional ways.\n\
             Keep them concise and formal.\n\
             Original: \"{}\"",
            sentence
        );
        let options = RequestOptions {
            schema: Some(json!({ "type": "ARRAY", "items": { "type": "STRING" } })),
            ..Default::default()
        };
        let reply = self.generate(&prompt, options).await?;
        let variations: Vec<String> = parse_json_reply(&reply.text)?;
        Ok(variations
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect())
    }

    async fn search_web(&self, term: &str) -> Result<WebContext> {
        let prompt = format!(
            "Find real-world business context, recent news, or a clear definition for the term: \"{}\". Provide a summary.",
            term
        );
        let options = RequestOptions {
            web_search: true,
            ..Default::default()
        };
        let reply = self.generate(&prompt, options).await?;
        Ok(WebContext {
            text: reply.text,
            links: reply.links,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_carries_schema_and_tools() {
        let options = RequestOptions {
            schema: Some(json!({ "type": "STRING" })),
            web_search: true,
        };
        let body = build_request_body("hello", &options);

        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "STRING");
        assert!(body["tools"][0].get("google_search").is_some());

        let plain = build_request_body("hi", &RequestOptions::default());
        assert!(plain.get("generationConfig").is_none());
        assert!(plain.get("tools").is_none());
    }

    #[test]
    fn test_extract_reply_joins_parts_and_collects_sources() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Hedging " }, { "text": "reduces risk." }] },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://example.com/a", "title": "Example" } },
                        { "web": { "uri": "https://example.com/b" } },
                        { "retrievedContext": {} }
                    ]
                }
            }]
        }))
        .unwrap();

        let reply = extract_reply(response);

        assert_eq!(reply.text, "Hedging reduces risk.");
        assert_eq!(reply.links.len(), 2);
        assert_eq!(reply.links[1].title, "Source");
    }

    #[test]
    fn test_extract_reply_without_candidates_is_empty() {
        let response: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        let reply = extract_reply(response);
        assert!(reply.text.is_empty());
        assert!(reply.links.is_empty());
    }

    #[test]
    fn test_json_payload_strips_code_fence() {
        let text = "Here you go:\n```json\n{\"title\": \"x\"}\n```\n";
        assert_eq!(json_payload(text), "{\"title\": \"x\"}");
        assert_eq!(json_payload("  [1, 2] "), "[1, 2]");
    }

    #[test]
    fn test_parse_json_reply_rejects_empty_text() {
        assert!(matches!(parse_json_reply::<Vec<String>>("  "), Err(ProviderError::EmptyResponse)));
        assert!(matches!(parse_json_reply::<Vec<String>>("not json"), Err(ProviderError::Json(_))));
    }

    #[test]
    fn test_daily_content_fills_missing_category_with_topic() {
        let wire: WireDailyContent = serde_json::from_value(json!({
            "terms": [
                { "term_en": "Burn Rate", "term_zh": "烧钱速度", "explanation": "Cash spent per month.", "example": "Our burn rate doubled." },
                { "term_en": "", "term_zh": "", "explanation": "" }
            ],
            "sentences": [
                { "content": "Let's review the runway.", "category": "Meeting" },
                { "content": "Noted, thanks." }
            ]
        }))
        .unwrap();

        let content = wire.into_content("Startup Finance");

        assert_eq!(content.terms.len(), 1);
        assert_eq!(content.terms[0].category, "Startup Finance");
        assert_eq!(content.terms[0].examples, vec!["Our burn rate doubled.".to_string()]);
        assert_eq!(content.sentences.len(), 2);
        assert_eq!(content.sentences[1].category, "Startup Finance");
    }

    #[test]
    fn test_resource_validation() {
        let good: WireResource = serde_json::from_value(json!({
            "title": "How to Negotiate", "url": "https://youtube.com/watch?v=1", "type": "Video", "summary": "Tactics."
        }))
        .unwrap();
        assert_eq!(good.into_resource().unwrap().kind, ResourceKind::Video);

        let unknown_type: WireResource = serde_json::from_value(json!({
            "title": "Essay", "url": "https://hbr.org/x", "type": "article", "summary": ""
        }))
        .unwrap();
        assert_eq!(unknown_type.into_resource().unwrap().kind, ResourceKind::Blog);

        let no_url: WireResource = serde_json::from_value(json!({ "title": "Missing" })).unwrap();
        assert!(no_url.into_resource().is_none());
    }

    #[test]
    fn test_endpoint_uses_model_and_trims_base_url() {
        let config = ProviderConfig {
            api_key: Some("k".to_string()),
            base_url: "https://example.test/v1beta/".to_string(),
            model: "some-model".to_string(),
            ..ProviderConfig::default()
        };
        let provider = GeminiProvider::new(&config).unwrap();
        assert_eq!(
            provider.endpoint(),
            "https://example.test/v1beta/models/some-model:generateContent"
        );
    }
}
