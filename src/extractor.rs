//! Model reply extraction
//!
//! The model is asked to return an object literal mapping `"Hero"`,
//! `"About"` and `"Contact"` to arrow functions wrapping a `<section>`
//! tree, but the reply is free text from a non-deterministic generator and
//! arrives with prose, fences or reordered keys often enough that strict
//! parsing is hopeless. Extraction is best-effort text scraping over two
//! passes:
//!
//! 1. **Primary** — the strict `"Name": () => ( … <section>…</section> … )`
//!    shape, matched per name with a non-greedy, multi-line pattern.
//! 2. **Fallback** — for names the primary pass missed, the bare name
//!    followed eventually by a `<section>…</section>` pair.
//!
//! A name neither pass can locate is reported in the error, never replaced
//! by an empty body. No well-formedness check is made on the markup beyond
//! the outer `<section>` pair.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SectionsError;

/// Section names a generated reply must contain, in storage order.
pub const EXPECTED_SECTIONS: [&str; 3] = ["Hero", "About", "Contact"];

static PRIMARY_PATTERNS: Lazy<HashMap<&'static str, Regex>> = Lazy::new(|| {
    EXPECTED_SECTIONS
        .iter()
        .map(|name| {
            let pattern = format!(
                r#"(?s)"{name}"\s*:\s*\(\s*\)\s*=>\s*\(.*?<section[^>]*>.*?</section>.*?\)"#
            );
            (*name, Regex::new(&pattern).expect("valid primary pattern"))
        })
        .collect()
});

static FALLBACK_PATTERNS: Lazy<HashMap<&'static str, Regex>> = Lazy::new(|| {
    EXPECTED_SECTIONS
        .iter()
        .map(|name| {
            let pattern = format!(r"(?s){name}.*?<section[^>]*>.*?</section>");
            (*name, Regex::new(&pattern).expect("valid fallback pattern"))
        })
        .collect()
});

/// Extract the expected section bodies from a raw model reply.
///
/// Returns a name → body mapping with an entry for every name in
/// [`EXPECTED_SECTIONS`], or [`SectionsError::MissingSections`] listing
/// exactly the names neither pass could locate.
pub fn extract_sections(raw: &str) -> Result<HashMap<String, String>, SectionsError> {
    let text = strip_code_fence(raw);
    let mut sections: HashMap<String, String> = HashMap::new();

    for name in EXPECTED_SECTIONS {
        if let Some(m) = PRIMARY_PATTERNS[name].find(&text) {
            sections.insert(name.to_string(), m.as_str().to_string());
        }
    }

    if sections.len() < EXPECTED_SECTIONS.len() {
        for name in EXPECTED_SECTIONS {
            if sections.contains_key(name) {
                continue;
            }
            if let Some(m) = FALLBACK_PATTERNS[name].find(&text) {
                sections.insert(name.to_string(), m.as_str().to_string());
            }
        }

        let missing: Vec<String> = EXPECTED_SECTIONS
            .iter()
            .filter(|name| !sections.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SectionsError::MissingSections { missing });
        }
    }

    Ok(sections)
}

/// Strip one enclosing markdown code fence (```json … ``` or ``` … ```)
/// when the whole reply is wrapped in it.
fn strip_code_fence(text: &str) -> String {
    let text = text.trim();
    if text.starts_with("```") && text.ends_with("```") {
        let lines: Vec<&str> = text.lines().collect();
        if lines.len() > 2 {
            // Drop the opening fence line (with any language tag) and the
            // closing fence line.
            return lines[1..lines.len() - 1].join("\n");
        }
    }
    text.to_string()
}
