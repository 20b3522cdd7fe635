//! Section Generator
//!
//! Coordinates one end-to-end "generate sections from a prompt" run: build
//! the instruction template, make the single model call, extract the three
//! section bodies, and hand the assembled record to the store. A single
//! model-call failure or extraction failure is terminal for the request;
//! nothing is retried and nothing partial is persisted.

use std::sync::Arc;

use tracing::{info, warn};

use crate::agentic::{LlmClient, OpenRouterClient};
use crate::database::SectionStore;
use crate::error::SectionsError;
use crate::extractor::{extract_sections, EXPECTED_SECTIONS};
use crate::models::{SectionItem, SectionRecord, StoredSectionRecord};

/// Orchestrator for section generation, saving and listing.
pub struct SectionGenerator {
    client: Option<Arc<dyn LlmClient>>,
    store: Arc<dyn SectionStore>,
}

impl SectionGenerator {
    /// Create from process configuration. A missing model credential is
    /// remembered and surfaced on the first `generate` call; saving and
    /// listing stay available without it.
    pub fn from_env(store: Arc<dyn SectionStore>) -> Self {
        let client = OpenRouterClient::from_env()
            .ok()
            .map(|c| Arc::new(c) as Arc<dyn LlmClient>);
        Self { client, store }
    }

    /// Create with a specific LLM client
    pub fn with_client(client: Arc<dyn LlmClient>, store: Arc<dyn SectionStore>) -> Self {
        Self {
            client: Some(client),
            store,
        }
    }

    /// Create with no model credential configured
    pub fn without_client(store: Arc<dyn SectionStore>) -> Self {
        Self {
            client: None,
            store,
        }
    }

    /// Generate the three sections for a prompt and upsert them as the
    /// single current generated record.
    pub async fn generate(&self, prompt: &str) -> Result<StoredSectionRecord, SectionsError> {
        let client = match self.client.as_ref() {
            Some(client) => client,
            None => return Err(SectionsError::MissingApiKey),
        };

        info!(
            provider = client.provider_name(),
            model = client.model_name(),
            "generating sections"
        );

        match self.generate_inner(client.as_ref(), prompt).await {
            Ok(record) => Ok(record),
            Err(err) => {
                warn!("section generation failed: {err}");
                Err(SectionsError::Generation(Box::new(err)))
            }
        }
    }

    async fn generate_inner(
        &self,
        client: &dyn LlmClient,
        prompt: &str,
    ) -> Result<StoredSectionRecord, SectionsError> {
        let system_prompt = build_system_prompt();
        let user_prompt = build_user_prompt(prompt);

        let raw = client.chat(system_prompt, &user_prompt).await?;
        if raw.trim().is_empty() {
            return Err(SectionsError::EmptyCompletion);
        }

        let mut bodies = extract_sections(&raw)?;

        let mut sections = Vec::with_capacity(EXPECTED_SECTIONS.len());
        for name in EXPECTED_SECTIONS {
            let code = bodies
                .remove(name)
                .ok_or_else(|| SectionsError::MissingSections {
                    missing: vec![name.to_string()],
                })?;
            sections.push(SectionItem {
                name: name.to_string(),
                code,
            });
        }

        let record = SectionRecord {
            prompt: prompt.to_string(),
            sections,
        };
        self.store.upsert_generated(&record).await
    }

    /// Save caller-supplied sections as a new record.
    pub async fn save(
        &self,
        prompt: &str,
        sections: &[SectionItem],
    ) -> Result<StoredSectionRecord, SectionsError> {
        self.store.save_provided(prompt, sections).await
    }

    /// List every stored record.
    pub async fn list(&self) -> Result<Vec<StoredSectionRecord>, SectionsError> {
        self.store.list_all().await
    }
}

fn build_system_prompt() -> &'static str {
    r#"# Landing Page Section Generator

You are a professional UI/UX component generator. For every client brief you
produce exactly 3 modern, styled landing page sections:

- "Hero": a bold welcome section with heading, subheading, and button.
- "About": a brief description of the company or idea.
- "Contact": a simple form with inputs and a button.

## Design Rules

1. Use unique and modern color combinations, clear visual hierarchy,
   alignment, and spacing.
2. Use only inline styles inside style={{ ... }}.
3. Ensure responsiveness using only vh, vw, %, and px units.
4. Use bold buttons, clean forms, and centered layout.
5. Use real-looking content (e.g. "Welcome to GymPro", "Submit").

## Absolutely Do Not

- Include markdown fences or any text outside the object literal.
- Include explanations, labels, or comments of any kind.
- Use media queries, CSS class names, styled-components, or external styles.
- Use JavaScript variables or dynamic expressions inside the markup.

## Output Format

{
  "Hero": () => (<section style={{...}}>...</section>),
  "About": () => (<section style={{...}}>...</section>),
  "Contact": () => (<section style={{...}}>...</section>)
}

Do not include anything else."#
}

fn build_user_prompt(prompt: &str) -> String {
    format!("CLIENT BRIEF: Design a landing page for a \"{prompt}\". Generate the 3 sections now.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_embeds_brief() {
        let prompt = build_user_prompt("bakery landing page");
        assert!(prompt.contains("\"bakery landing page\""));
    }

    #[test]
    fn test_system_prompt_states_format_rules() {
        let prompt = build_system_prompt();
        for name in EXPECTED_SECTIONS {
            assert!(prompt.contains(&format!("\"{name}\"")));
        }
        assert!(prompt.contains("inline styles"));
        assert!(prompt.contains("Do not include anything else."));
    }
}
