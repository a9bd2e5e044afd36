// src/llm/content.rs
// The content adapter: five domain operations against the generative
// provider. Every operation is total — provider failures are logged and
// folded into fixed fallback values, so callers always get a renderable
// result.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error};

use crate::config::CONFIG;
use crate::llm::client::{GenerativeProvider, ProviderError};
use crate::llm::prompts;
use crate::types::{AdaptationResult, FairyTale, PosterTheme, ReframeResult};

pub const FALLBACK_REFRAME_IMAGE: &str = "https://picsum.photos/400/400?blur=2";
pub const FALLBACK_POSTER_IMAGE: &str = "https://picsum.photos/400/600?blur=2";

pub const REFRAME_FALLBACK_EXPLANATION: &str = "抱歉，我现在有点累，没能理解你的话。";
pub const REFRAME_FALLBACK_ANALYSIS: &str = "请稍后再试。";
pub const REFRAME_FALLBACK_SOLUTION: &str = "休息一下吧。";

pub const ADAPTATION_FALLBACK_ADVICE: &str = "现在的感觉也许有些难熬，但你已经很勇敢了。";
pub const ADAPTATION_FALLBACK_STEP: &str = "深呼吸三次，告诉自己：这就足够了。";

pub const STORY_FALLBACK_TITLE: &str = "未命名的故事";
pub const STORY_FALLBACK_CONTENT: &str = "魔法似乎暂时失效了，请稍后再试...";

const STORY_ENTRY_SEPARATOR: &str = "\n---\n";

pub fn fallback_letter(name: &str) -> String {
    format!(
        "亲爱的 {name}，\n\n很高兴你能来到这里。虽然我无法立刻抹去所有的伤痛，但请相信，\
         你并不孤单。你经历的一切我都看在眼里，你已经做得很好了。请给自己一点时间，慢慢来，\
         阳光终会再次照耀。"
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReframePayload {
    warm_explanation: Option<String>,
    psych_analysis: Option<String>,
    solution: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdaptationPayload {
    warm_advice: Option<String>,
    action_step: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StoryPayload {
    title: Option<String>,
    content: Option<String>,
}

pub struct ContentAdapter {
    provider: Arc<dyn GenerativeProvider>,
    text_model: String,
    story_model: String,
    image_model: String,
}

impl ContentAdapter {
    pub fn new(provider: Arc<dyn GenerativeProvider>) -> Self {
        Self::with_models(
            provider,
            &CONFIG.text_model,
            &CONFIG.story_model,
            &CONFIG.image_model,
        )
    }

    pub fn with_models(
        provider: Arc<dyn GenerativeProvider>,
        text_model: &str,
        story_model: &str,
        image_model: &str,
    ) -> Self {
        Self {
            provider,
            text_model: text_model.to_string(),
            story_model: story_model.to_string(),
            image_model: image_model.to_string(),
        }
    }

    /// Turn a hurtful sentence into a warm explanation, a short psychological
    /// reading and one tiny action, plus a healing illustration. The text and
    /// image sub-calls fall back independently.
    pub async fn reframe_language(&self, input: &str) -> ReframeResult {
        let (warm_explanation, psych_analysis, solution) = match self
            .request_json::<ReframePayload>(&self.text_model, &prompts::reframe_prompt(input))
            .await
        {
            Ok(payload) => (
                field_or(payload.warm_explanation, REFRAME_FALLBACK_EXPLANATION),
                field_or(payload.psych_analysis, REFRAME_FALLBACK_ANALYSIS),
                field_or(payload.solution, REFRAME_FALLBACK_SOLUTION),
            ),
            Err(e) => {
                error!("Text reframe failed: {}", e);
                (
                    REFRAME_FALLBACK_EXPLANATION.to_string(),
                    REFRAME_FALLBACK_ANALYSIS.to_string(),
                    REFRAME_FALLBACK_SOLUTION.to_string(),
                )
            }
        };

        let image_url = match self
            .provider
            .generate_image(
                &self.image_model,
                &prompts::healing_image_prompt(&warm_explanation),
            )
            .await
        {
            Ok(url) => url,
            Err(e) => {
                error!("Healing image generation failed: {}", e);
                FALLBACK_REFRAME_IMAGE.to_string()
            }
        };

        ReframeResult {
            original_text: input.to_string(),
            warm_explanation,
            psych_analysis,
            solution,
            image_url: Some(image_url),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Warm, low-pressure advice for a feared reintegration scenario.
    pub async fn adaptation_advice(&self, scenario: &str) -> AdaptationResult {
        let (warm_advice, action_step) = match self
            .request_json::<AdaptationPayload>(
                &self.text_model,
                &prompts::adaptation_prompt(scenario),
            )
            .await
        {
            Ok(payload) => (
                field_or(payload.warm_advice, ADAPTATION_FALLBACK_ADVICE),
                field_or(payload.action_step, ADAPTATION_FALLBACK_STEP),
            ),
            Err(e) => {
                error!("Adaptation advice failed: {}", e);
                (
                    ADAPTATION_FALLBACK_ADVICE.to_string(),
                    ADAPTATION_FALLBACK_STEP.to_string(),
                )
            }
        };

        AdaptationResult {
            scenario: scenario.to_string(),
            warm_advice,
            action_step,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Weave selected diary entries into a short fairy tale. Uses the
    /// higher-capability story model.
    pub async fn weave_story(&self, entries: &[String]) -> FairyTale {
        let joined = entries.join(STORY_ENTRY_SEPARATOR);

        let (title, content) = match self
            .request_json::<StoryPayload>(&self.story_model, &prompts::story_prompt(&joined))
            .await
        {
            Ok(payload) => (
                field_or(payload.title, STORY_FALLBACK_TITLE),
                field_or(payload.content, STORY_FALLBACK_CONTENT),
            ),
            Err(e) => {
                error!("Story weaving failed: {}", e);
                (
                    STORY_FALLBACK_TITLE.to_string(),
                    STORY_FALLBACK_CONTENT.to_string(),
                )
            }
        };

        FairyTale {
            title,
            content,
            generated_date: Utc::now(),
        }
    }

    /// Personalized onboarding letter. Total: a provider failure yields the
    /// templated letter.
    pub async fn healing_letter(&self, name: &str, experience: &str) -> String {
        match self.try_healing_letter(name, experience).await {
            Ok(letter) => letter,
            Err(e) => {
                error!("Healing letter generation failed: {}", e);
                fallback_letter(name)
            }
        }
    }

    /// Fallible inner seam for the onboarding flow, which skips the letter
    /// step entirely when generation fails instead of showing the template.
    pub async fn try_healing_letter(
        &self,
        name: &str,
        experience: &str,
    ) -> Result<String, ProviderError> {
        self.provider
            .generate_text(
                &self.text_model,
                &prompts::letter_prompt(name, experience),
                false,
            )
            .await
    }

    /// Share poster image for the given theme.
    pub async fn share_poster(&self, theme: PosterTheme) -> String {
        match self
            .provider
            .generate_image(&self.image_model, prompts::poster_prompt(theme))
            .await
        {
            Ok(url) => url,
            Err(e) => {
                error!("Poster generation ({}) failed: {}", theme.as_str(), e);
                FALLBACK_POSTER_IMAGE.to_string()
            }
        }
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<T, ProviderError> {
        let raw = self.provider.generate_text(model, prompt, true).await?;
        parse_json_payload(&raw)
    }
}

/// Parse a JSON payload leniently: the provider is asked for bare JSON but
/// sometimes wraps it in a markdown code fence anyway.
fn parse_json_payload<T: DeserializeOwned>(raw: &str) -> Result<T, ProviderError> {
    let cleaned = strip_code_fence(raw);
    serde_json::from_str(cleaned).map_err(|e| {
        debug!("Unparseable provider payload: {}", raw);
        ProviderError::Malformed(e.to_string())
    })
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence, then the closing fence.
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn field_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
