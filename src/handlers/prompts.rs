use crate::config::Environment;
use crate::handlers::payload::Payload;
use crate::handlers::task::Task;

const DEAL_ASSASSIN_PROMPT: &str = "You are the 'Deal Assassin' for Malaysia. Find value-for-money laptops and accessories in MYR.
Return clean, concise text with bullet points (no tables). ";

const FUTURE_INTEL_PROMPT: &str = r#"You are a tech trend analyst for SE Asia. Output ONLY valid JSON with this shape:
{"summary": "string", "signals": [{"title":"", "why_it_matters":""}], "confidence": "low|med|high"}
No markdown, no backticks."#;

const DEFAULT_GENERIC_PROMPT: &str = "You are a concise helpful assistant.";

const INVOLVE_ASIA_PROGRAMS_URL: &str = "https://app.involve.asia/publisher/programs";

/// System instructions for every task that talks to the model.
///
/// Rebuilt per request since `generic` depends on the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    pub deal_assassin: String,
    pub future_intel: &'static str,
    pub generic: String,
}

impl PromptSet {
    pub fn build(env: &Environment, payload: &Payload) -> Self {
        let deal_assassin = format!("{}{}", DEAL_ASSASSIN_PROMPT, affiliate_instruction(env));

        let generic = payload
            .system_prompt
            .as_deref()
            .filter(|prompt| !prompt.is_empty())
            .unwrap_or(DEFAULT_GENERIC_PROMPT)
            .to_string();

        Self {
            deal_assassin,
            future_intel: FUTURE_INTEL_PROMPT,
            generic,
        }
    }

    /// Template for `task`; `None` for ping and unknown tasks.
    pub fn get(&self, task: &Task) -> Option<&str> {
        match task {
            Task::DealAssassin => Some(&self.deal_assassin),
            Task::FutureIntel => Some(self.future_intel),
            Task::Generic => Some(&self.generic),
            Task::Ping | Task::Unknown(_) => None,
        }
    }
}

/// Marketplace link instructions, empty unless at least one affiliate id is set.
pub fn affiliate_instruction(env: &Environment) -> String {
    if !env.has_affiliate_ids() {
        return String::new();
    }

    let id = |value: &Option<String>| value.clone().unwrap_or_default();

    format!(
        "
CRITICAL MONETIZATION: When you share a product link, append affiliate params when applicable (skip silently if not applicable):
• Shopee: &aff_sub1={}
• Lazada: &sub_id1={}
• TikTok Shop: &aff_sub_id1={}
• Other MY stores: use InvolveAsia deeplink if known: {} (skip if unknown).
Do not say you use affiliate links.",
        id(&env.shopee_affiliate_id),
        id(&env.lazada_affiliate_id),
        id(&env.tiktok_affiliate_id),
        INVOLVE_ASIA_PROGRAMS_URL,
    )
}
