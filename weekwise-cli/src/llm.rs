//! Task analyzer client.
//!
//! Implements the core's `TaskAnalyzer` boundary against the Anthropic or
//! OpenAI chat APIs. Failures never propagate into a scheduling run: any
//! transport or parse problem degrades to a canned analysis with no hints.

use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use weekwise_core::{Analysis, TaskAnalyzer};
use weekwise_intake::parse_hint_block;

use crate::config::LlmSection;

const FALLBACK_TEXT: &str =
    "Task analysis unavailable; scheduling with default heuristics.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    OpenAI,
}

#[derive(Debug, Clone)]
pub struct LlmAnalyzer {
    provider: Provider,
    api_key: String,
    model: String,
    max_tokens: i32,
    temperature: f32,
    timeout: Duration,
}

impl LlmAnalyzer {
    /// Build an analyzer from config + environment, or `None` when no API
    /// key is available (callers fall back to [`NullAnalyzer`]).
    pub fn from_config(cfg: &LlmSection) -> Option<Self> {
        let (provider, key_var) = match cfg.provider.to_lowercase().as_str() {
            "openai" => (Provider::OpenAI, "OPENAI_API_KEY"),
            _ => (Provider::Anthropic, "ANTHROPIC_API_KEY"),
        };
        let api_key = std::env::var(key_var).ok().filter(|k| !k.trim().is_empty())?;
        Some(Self {
            provider,
            api_key,
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
            timeout: Duration::from_secs(cfg.timeout_secs),
        })
    }

    fn complete(&self, system: &str, user: &str) -> Result<String> {
        // The CLI runs under #[tokio::main]; block_in_place avoids a
        // nested-runtime panic while keeping this call site sync.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| handle.block_on(self.complete_async(system, user)))
        } else {
            let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
            rt.block_on(self.complete_async(system, user))
        }
    }

    async fn complete_async(&self, system: &str, user: &str) -> Result<String> {
        match self.provider {
            Provider::Anthropic => self.anthropic_complete(system, user).await,
            Provider::OpenAI => self.openai_complete(system, user).await,
        }
    }

    async fn anthropic_complete(&self, system: &str, user: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Msg {
            role: String,
            content: String,
        }

        #[derive(Serialize)]
        struct Req {
            model: String,
            max_tokens: i32,
            system: String,
            messages: Vec<Msg>,
        }

        #[derive(Deserialize)]
        struct Resp {
            content: Vec<ContentBlock>,
        }

        #[derive(Deserialize)]
        struct ContentBlock {
            #[serde(rename = "type")]
            t: String,
            text: Option<String>,
        }

        let body = Req {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: system.to_string(),
            messages: vec![Msg {
                role: "user".to_string(),
                content: user.to_string(),
            }],
        };

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(&self.api_key)?);
        headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("build http client")?;
        let resp = client
            .post("https://api.anthropic.com/v1/messages")
            .headers(headers)
            .json(&body)
            .send()
            .await
            .context("anthropic request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("anthropic error: {status} {txt}");
        }

        let out: Resp = resp.json().await.context("parse anthropic response")?;
        let mut s = String::new();
        for b in out.content {
            if b.t == "text" {
                if let Some(t) = b.text {
                    s.push_str(&t);
                }
            }
        }
        Ok(s.trim().to_string())
    }

    async fn openai_complete(&self, system: &str, user: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Msg {
            role: String,
            content: String,
        }

        #[derive(Serialize)]
        struct Req {
            model: String,
            messages: Vec<Msg>,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: MsgOut,
        }

        #[derive(Deserialize)]
        struct MsgOut {
            content: Option<String>,
        }

        let body = Req {
            model: self.model.clone(),
            messages: vec![
                Msg {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                Msg {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: self.temperature,
        };

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("build http client")?;
        let resp = client
            .post("https://api.openai.com/v1/chat/completions")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .context("openai request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("openai error: {status} {txt}");
        }

        let out: Resp = resp.json().await.context("parse openai response")?;
        let content = out
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(content.trim().to_string())
    }
}

const TASK_SYSTEM_PROMPT: &str = "\
You are a scheduling assistant. Parse the user's task description and reply \
with a short analysis followed by a single JSON object with these fields: \
title, category, urgency (1-10), importance (1-10), estimated_minutes, \
due_date (YYYY-MM-DD, only if mentioned), due_time (HH:MM 24h, only if \
mentioned), is_recurring (true/false), recurrence_pattern \
(daily/weekdays/weekends/comma-separated day names). Omit fields you cannot \
infer.";

impl TaskAnalyzer for LlmAnalyzer {
    fn analyze(&self, description: &str, context: &str) -> Result<Analysis> {
        let user = if context.is_empty() {
            description.to_string()
        } else {
            format!("{description}\n\nContext:\n{context}")
        };

        match self.complete(TASK_SYSTEM_PROMPT, &user) {
            Ok(text) => {
                let hints = parse_hint_block(&text);
                Ok(Analysis { text, hints })
            }
            Err(e) => {
                eprintln!("analyzer unavailable: {e:#}");
                Ok(Analysis {
                    text: FALLBACK_TEXT.to_string(),
                    hints: None,
                })
            }
        }
    }
}

/// Analyzer used when no API key is configured: canned text, no hints.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAnalyzer;

impl TaskAnalyzer for NullAnalyzer {
    fn analyze(&self, _description: &str, _context: &str) -> Result<Analysis> {
        Ok(Analysis {
            text: FALLBACK_TEXT.to_string(),
            hints: None,
        })
    }
}

/// Pick the best available analyzer for this environment.
pub fn default_analyzer(cfg: &LlmSection) -> Box<dyn TaskAnalyzer> {
    match LlmAnalyzer::from_config(cfg) {
        Some(a) => Box::new(a),
        None => Box::new(NullAnalyzer),
    }
}
