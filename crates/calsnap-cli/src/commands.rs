//! Command handlers: extract, list, export, clear.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Local;
use tracing::info;

use calsnap_core::CalendarEvent;
use calsnap_export::{SCHEDULE_FILENAME, calendar_document, share_url};
use calsnap_extract::{
    ExtractRequest, Extractor, ModelAlias, OracleClient, OraclePayload, Usage,
};

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::store::EventStore;

/// Shared command context: file config plus command-line overrides.
#[derive(Debug)]
pub struct Context {
    pub config: CliConfig,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl Context {
    fn store(&self) -> EventStore {
        EventStore::new(self.config.events_path())
    }

    /// Resolves the model alias (flag wins over config) to a model id.
    fn model_id(&self) -> CliResult<&'static str> {
        match self.model.as_deref().or(self.config.model.as_deref()) {
            None => Ok(ModelAlias::default().model_id()),
            Some(raw) => ModelAlias::parse(raw).map(|alias| alias.model_id()).ok_or_else(|| {
                CliError::Config(format!(
                    "unknown model alias '{}' (expected google or qwen)",
                    raw
                ))
            }),
        }
    }

    fn api_key(&self) -> CliResult<String> {
        self.api_key
            .clone()
            .or_else(|| self.config.api_key.clone())
            .ok_or_else(|| {
                CliError::Config(
                    "no API key; pass --api-key or set OPENROUTER_API_KEY".to_string(),
                )
            })
    }
}

/// Extracts events from a schedule image and stores them.
pub async fn image(ctx: &Context, path: &Path) -> CliResult<()> {
    let payload = OraclePayload::Image {
        data_uri: image_data_uri(path)?,
    };
    extract_and_store(ctx, payload).await
}

/// Extracts events from a free-text message and stores them.
pub async fn text(ctx: &Context, message: &str) -> CliResult<()> {
    let payload = OraclePayload::Text {
        content: message.to_string(),
    };
    extract_and_store(ctx, payload).await
}

/// Lists the stored events.
pub fn list(ctx: &Context) -> CliResult<()> {
    let events = ctx.store().load()?;
    if events.is_empty() {
        print_empty_store_hint();
        return Ok(());
    }

    println!("{} stored event(s):", events.len());
    println!();
    print_events(&events);
    Ok(())
}

/// Writes the stored events to an iCalendar file.
pub fn export_ics(ctx: &Context, output: Option<PathBuf>) -> CliResult<()> {
    let events = ctx.store().load()?;
    if events.is_empty() {
        print_empty_store_hint();
        return Ok(());
    }

    let path = output.unwrap_or_else(|| PathBuf::from(SCHEDULE_FILENAME));
    std::fs::write(&path, calendar_document(&events))?;
    println!("Wrote {} event(s) to {}", events.len(), path.display());
    Ok(())
}

/// Prints a Google Calendar link for each stored event.
pub fn export_url(ctx: &Context) -> CliResult<()> {
    let events = ctx.store().load()?;
    if events.is_empty() {
        print_empty_store_hint();
        return Ok(());
    }

    for event in &events {
        println!("{}: {}", event.activity, share_url(event));
    }
    Ok(())
}

/// Discards the stored events.
pub fn clear(ctx: &Context) -> CliResult<()> {
    ctx.store().clear()?;
    println!("Cleared stored events.");
    Ok(())
}

async fn extract_and_store(ctx: &Context, payload: OraclePayload) -> CliResult<()> {
    let api_key = ctx.api_key()?;
    let client = match &ctx.config.base_url {
        Some(url) => OracleClient::with_endpoint(api_key, url.clone())?,
        None => OracleClient::new(api_key)?,
    };

    let request = ExtractRequest {
        model: ctx.model_id()?.to_string(),
        payload,
        today: Local::now().date_naive(),
    };

    let extraction = Extractor::new(client).extract(&request).await?;

    let store = ctx.store();
    store.save(&extraction.events)?;
    info!(path = %store.path().display(), "stored extraction result");

    println!("Extracted {} event(s):", extraction.events.len());
    println!();
    print_events(&extraction.events);
    print_usage(extraction.usage);
    Ok(())
}

/// Reads an image file into a base64 data URI.
fn image_data_uri(path: &Path) -> CliResult<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => return Err(CliError::UnsupportedImage(path.display().to_string())),
    };

    let bytes = std::fs::read(path)?;
    Ok(format!("data:{};base64,{}", mime, BASE64.encode(bytes)))
}

fn format_when(event: &CalendarEvent) -> String {
    let date = match event.date {
        Some(date) => date.to_string(),
        None => "(no date)".to_string(),
    };
    let span = match event.end_date {
        Some(end) => format!("{} - {}", date, end),
        None => date,
    };
    match (&event.start_time, &event.end_time) {
        (Some(start), Some(end)) => format!("{} {} - {}", span, start, end),
        (Some(start), None) => format!("{} {}", span, start),
        _ => format!("{} (all day)", span),
    }
}

fn print_events(events: &[CalendarEvent]) {
    for (index, event) in events.iter().enumerate() {
        println!("{:3}. {}", index + 1, event.activity);
        println!("     {}", format_when(event));
        if !event.location.is_empty() {
            println!("     Location: {}", event.location);
        }
        if !event.notes.is_empty() {
            println!("     Notes: {}", event.notes);
        }
        if event.is_recurring() {
            println!("     Repeats: {}", event.recurrence);
        }
    }
}

fn print_usage(usage: Option<Usage>) {
    if let Some(usage) = usage {
        println!();
        println!(
            "Tokens: {} prompt + {} completion = {} total",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        );
    }
}

fn print_empty_store_hint() {
    println!("No stored events. Run 'calsnap image <path>' or 'calsnap text <message>' first.");
}
