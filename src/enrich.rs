//! LLM backfill of nps_established and previous_names via the OpenAI API

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::store::{load_sites, save_sites};
use crate::types::SiteRecord;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4.1";
// Pause between calls to stay under rate limits.
const REQUEST_DELAY: Duration = Duration::from_millis(1500);

const ESTABLISHED_PROMPT: &str = "You are an assistant that returns only the established date for \
US National Park Service (NPS) sites. The user will provide the name of an NPS site. Respond with \
only the established year in YYYY format. If the established date is not available, respond with \
\"Unknown\". Do not include any additional text, explanation, or context.";

const PREVIOUS_NAMES_PROMPT: &str = "You are an assistant that returns a list of previous official \
National Park Service (NPS) names for a given site, excluding the site's current name. The user \
will provide the current name of an NPS site. Respond with a JSON array of all previous \
NPS-recognized names the site has had since its establishment, in chronological order. If there \
have been no previous names, respond with an empty array []. Do not include the current name in \
the list. Do not provide any explanation or extra text.";

// OpenAI chat completion types
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: &'static str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
    error: Option<ChatError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatError {
    message: String,
}

fn get_api_key() -> Result<String> {
    std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY environment variable must be set")
}

/// One chat completion: system prompt plus the site name, trimmed reply back.
fn complete(
    client: &reqwest::blocking::Client,
    api_key: &str,
    system_prompt: &'static str,
    site_name: &str,
) -> Result<String> {
    let request = ChatRequest {
        model: OPENAI_MODEL,
        messages: vec![
            ChatMessage {
                role: "system",
                content: system_prompt.to_string(),
            },
            ChatMessage {
                role: "user",
                content: site_name.to_string(),
            },
        ],
    };

    let response: ChatResponse = client
        .post(OPENAI_API_URL)
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .context("Failed to send request to OpenAI API")?
        .json()
        .context("Failed to parse OpenAI response JSON")?;

    if let Some(error) = response.error {
        bail!("OpenAI API error: {}", error.message);
    }

    let choices = response.choices.context("No choices in OpenAI response")?;
    let first = choices.first().context("Empty choices array")?;
    Ok(first.message.content.trim().to_string())
}

/// Parse a previous-names reply. Anything that isn't a JSON array of strings
/// counts as "no previous names".
fn parse_previous_names(content: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(content) {
        Ok(names) => names,
        Err(_) => Vec::new(),
    }
}

/// Shared backfill loop: for every site missing the target field (or all
/// sites with `force`), query the model and apply the reply. `apply` returns
/// whether the record changed. The store is rewritten only when something
/// changed.
fn run_backfill(
    store: &str,
    quiet: bool,
    force: bool,
    label: &str,
    needs_query: impl Fn(&SiteRecord) -> bool,
    system_prompt: &'static str,
    apply: impl Fn(&mut SiteRecord, String) -> bool,
) -> Result<()> {
    let api_key = get_api_key()?;
    let client = reqwest::blocking::Client::builder()
        .user_agent("Mozilla/5.0 (compatible; NPSSitesCollector/1.0)")
        .build()?;

    let store_path = Path::new(store);
    let mut sites = load_sites(store_path)?;
    if sites.is_empty() {
        bail!("Site store {} is empty. Run 'sync' first.", store);
    }

    let mut changed = 0u32;
    let mut queried = 0u32;

    for site in sites.iter_mut() {
        if !force && !needs_query(site) {
            continue;
        }

        if !quiet {
            println!("Querying {} for: {}", label, site.name);
        }
        let reply = complete(&client, &api_key, system_prompt, &site.name)?;
        queried += 1;

        if apply(site, reply) {
            changed += 1;
        }
        std::thread::sleep(REQUEST_DELAY);
    }

    if changed > 0 {
        save_sites(store_path, &sites)?;
    }
    if !quiet {
        if changed > 0 {
            println!(
                "Done! Queried {} sites, updated {} in {}",
                queried, changed, store
            );
        } else {
            println!("No changes made. Queried {} sites.", queried);
        }
    }
    Ok(())
}

/// Backfill `nps_established` for every site missing it. The model's reply
/// ("YYYY" or "Unknown") is stored verbatim.
pub fn run_established(store: &str, quiet: bool, force: bool) -> Result<()> {
    run_backfill(
        store,
        quiet,
        force,
        "established date",
        |site| site.nps_established.is_none(),
        ESTABLISHED_PROMPT,
        |site, reply| {
            if !quiet {
                println!(" -> {}", reply);
            }
            let update = Some(reply);
            if site.nps_established == update {
                return false;
            }
            site.nps_established = update;
            true
        },
    )
}

/// Backfill `previous_names` for every site missing it. Sites the model
/// reports no previous names for keep the field absent rather than storing
/// an empty list.
pub fn run_previous_names(store: &str, quiet: bool, force: bool) -> Result<()> {
    run_backfill(
        store,
        quiet,
        force,
        "previous names",
        |site| site.previous_names.is_none(),
        PREVIOUS_NAMES_PROMPT,
        |site, reply| {
            let names = parse_previous_names(&reply);
            if names.is_empty() {
                if !quiet {
                    println!(" -> none");
                }
                return false;
            }
            if !quiet {
                println!(" -> {:?}", names);
            }
            site.previous_names = Some(names);
            true
        },
    )
}
