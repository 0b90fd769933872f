//! Generative insight production.
//!
//! Renders a user's financial facts into a prompt, asks the configured
//! provider for 3-5 short insights as JSON, and parses the reply. Providers
//! are reached through rig-core; the provider/model/key come from server
//! configuration.

use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use rig::{
    client::{CompletionClient, Nothing},
    completion::Prompt,
    providers::{anthropic, gemini, groq, ollama, openai},
};

use crate::error::AiError;
use moneta_core::errors::Result;
use moneta_core::insights::{FinancialFacts, Insight, InsightGeneratorTrait};

/// Provider settings for insight generation.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider id: `openai`, `anthropic`, `gemini`, `groq`, or `ollama`.
    /// Anything else is treated as OpenAI-compatible.
    pub provider_id: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Base URL override, used by `ollama`.
    pub base_url: Option<String>,
}

/// Insight generator backed by a generative model.
pub struct RigInsightGenerator {
    config: ProviderConfig,
}

impl RigInsightGenerator {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    async fn complete(&self, prompt: &str) -> std::result::Result<String, AiError> {
        let ProviderConfig {
            provider_id,
            model,
            api_key,
            base_url,
        } = &self.config;
        debug!("generating insights with provider {} model {}", provider_id, model);

        let require_key = || {
            api_key
                .clone()
                .ok_or_else(|| AiError::MissingApiKey(provider_id.clone()))
        };

        let response = match provider_id.as_str() {
            "anthropic" => {
                let client: anthropic::Client<HttpClient> =
                    anthropic::Client::new(&require_key()?)
                        .map_err(|e| AiError::Provider(e.to_string()))?;
                client
                    .agent(model)
                    .build()
                    .prompt(prompt)
                    .await
                    .map_err(|e| AiError::Provider(e.to_string()))?
            }
            "gemini" | "google" => {
                let client: gemini::Client<HttpClient> = gemini::Client::new(&require_key()?)
                    .map_err(|e| AiError::Provider(e.to_string()))?;
                client
                    .agent(model)
                    .build()
                    .prompt(prompt)
                    .await
                    .map_err(|e| AiError::Provider(e.to_string()))?
            }
            "groq" => {
                let client: groq::Client<HttpClient> = groq::Client::new(&require_key()?)
                    .map_err(|e| AiError::Provider(e.to_string()))?;
                client
                    .agent(model)
                    .build()
                    .prompt(prompt)
                    .await
                    .map_err(|e| AiError::Provider(e.to_string()))?
            }
            "ollama" => {
                let mut builder = ollama::Client::<HttpClient>::builder().api_key(Nothing);
                if let Some(url) = base_url {
                    builder = builder.base_url(url);
                }
                let client = builder
                    .build()
                    .map_err(|e| AiError::Provider(e.to_string()))?;
                client
                    .agent(model)
                    .build()
                    .prompt(prompt)
                    .await
                    .map_err(|e| AiError::Provider(e.to_string()))?
            }
            _ => {
                let client: openai::Client<HttpClient> = openai::Client::new(&require_key()?)
                    .map_err(|e| AiError::Provider(e.to_string()))?;
                client
                    .agent(model)
                    .build()
                    .prompt(prompt)
                    .await
                    .map_err(|e| AiError::Provider(e.to_string()))?
            }
        };

        Ok(response)
    }
}

#[async_trait]
impl InsightGeneratorTrait for RigInsightGenerator {
    async fn generate(&self, facts: &FinancialFacts) -> Result<Vec<Insight>> {
        let prompt = build_prompt(facts);
        let response = self
            .complete(&prompt)
            .await
            .map_err(moneta_core::Error::from)?;
        let insights = parse_insights(&response)?;
        Ok(insights)
    }
}

/// Renders the facts into the generation prompt.
fn build_prompt(facts: &FinancialFacts) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "This month the user recorded {:.2} in income and {:.2} in expenses.",
        facts.month_income, facts.month_expense
    ));
    lines.push(format!(
        "Their standing profile: {:.2} monthly income, {:.2} in recurring expenses.",
        facts.monthly_income, facts.recurring_expense_total
    ));
    for jar in &facts.jars {
        lines.push(format!(
            "Savings jar \"{}\": {:.2} saved of a {:.2} target.",
            jar.jar_name, jar.amount_saved, jar.goal_amount
        ));
    }
    for goal in &facts.goals {
        lines.push(format!(
            "Goal \"{}\": {:.2} saved of {:.2}{}.",
            goal.goal_name,
            goal.amount_saved,
            goal.target_amount,
            if goal.completed { " (completed)" } else { "" }
        ));
    }
    if facts.due_charge_count > 0 {
        lines.push(format!(
            "{} bill(s) are past due and unpaid.",
            facts.due_charge_count
        ));
    }

    format!(
        "You are a personal-finance assistant. Based on these facts about a \
user's finances, write 3 to 5 short, encouraging insights.\n\
Facts:\n{}\n\n\
Reply with ONLY a JSON array, no markdown fences, where each element is \
{{\"title\": string, \"description\": string, \"kind\": one of \
\"positive\"|\"tip\"|\"suggestion\"|\"reminder\"}}. Keep titles under 6 words \
and descriptions under 20 words.",
        lines.join("\n")
    )
}

/// Extracts the JSON insight array from a model reply, tolerating markdown
/// fences and prose around it.
fn parse_insights(response: &str) -> std::result::Result<Vec<Insight>, AiError> {
    let start = response.find('[');
    let end = response.rfind(']');
    let (Some(start), Some(end)) = (start, end) else {
        return Err(AiError::BadResponse("no JSON array in reply".to_string()));
    };
    if end < start {
        return Err(AiError::BadResponse("no JSON array in reply".to_string()));
    }

    let insights: Vec<Insight> = serde_json::from_str(&response[start..=end])
        .map_err(|e| AiError::BadResponse(e.to_string()))?;
    if insights.is_empty() {
        return Err(AiError::BadResponse("model returned no insights".to_string()));
    }
    // Never surface more than the UI expects.
    Ok(insights.into_iter().take(5).collect())
}
