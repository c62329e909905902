//! System status command.

use anyhow::Result;
use console::style;

use ppss_core::repository::conversation::ConversationRepository;
use ppss_core::repository::session::SessionRepository;
use ppss_types::stage::Stage;

use crate::state::AppState;

/// Print profile and conversation counts, latest summary per stage, and
/// gateway mode.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let profiles = state.sessions.repo().count_profiles().await?;
    let conversations = state.chat.conversations().count_conversations().await?;

    let mut latest = Vec::with_capacity(Stage::ALL.len());
    for stage in Stage::ALL {
        let record = state.summaries.latest_record(stage).await?;
        latest.push((stage, record.map(|r| r.created_at)));
    }

    let gateway = state.gateway.name();
    let mode = if gateway == "placeholder" { "placeholder" } else { "live" };

    if json {
        let summaries: serde_json::Map<String, serde_json::Value> = latest
            .iter()
            .map(|(stage, at)| {
                (
                    stage.to_string(),
                    at.map(|t| serde_json::Value::String(t.to_rfc3339()))
                        .unwrap_or(serde_json::Value::Null),
                )
            })
            .collect();
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "profiles": profiles,
            "conversations": conversations,
            "latest_summaries": summaries,
            "gateway": {
                "mode": mode,
                "name": gateway,
                "model": state.gateway.model(),
                "timeout_secs": state.gateway.timeout().as_secs(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("  {} PPSS v{}", style("⚡").bold(), env!("CARGO_PKG_VERSION"));
    println!();

    println!("  {}", style("── Storage ──").dim());
    println!("  Agent profiles: {}", style(profiles).bold());
    println!("  Conversations:  {}", style(conversations).bold());
    println!();

    println!("  {}", style("── Stage summaries ──").dim());
    for (stage, at) in &latest {
        match at {
            Some(t) => println!(
                "  {:<20} {}",
                stage.as_str(),
                style(t.format("%Y-%m-%d %H:%M UTC")).green()
            ),
            None => println!("  {:<20} {}", stage.as_str(), style("none yet").dim()),
        }
    }
    println!();

    println!("  {}", style("── Gateway ──").dim());
    let mode_styled = if mode == "live" {
        style(mode).green()
    } else {
        style(mode).yellow()
    };
    println!("  Mode:  {mode_styled}");
    println!("  Model: {}", style(state.gateway.model()).dim());
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!("  Database: {}", style("SQLite (WAL mode)").dim());
    println!();

    Ok(())
}
