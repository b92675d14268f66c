//! Plain-text formatting for terminal output.

use adcraft_core::{provider_label, script_preview, Outcome, ProviderInfo};
use adcraft_engine::{AdScript, Campaign};

const BAR_WIDTH: usize = 20;

/// `[######--------------]  30% Analyzing audience...`
pub fn progress_line(percent: u8, message: &str) -> String {
    let percent = percent.min(100);
    let filled = usize::from(percent) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}% {}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        percent,
        message
    )
}

pub fn outcome_line(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Completed(Some(payload)) => format!("Done: {payload}"),
        Outcome::Completed(None) => "Done.".to_string(),
        Outcome::Failed(reason) => format!("Failed [{}]: {reason}", reason.code()),
    }
}

pub fn campaign_line(campaign: &Campaign) -> String {
    format!(
        "#{:<4} {}  ({}; {})",
        campaign.id, campaign.product_name, campaign.niche, campaign.campaign_goal
    )
}

pub fn provider_line(provider: &ProviderInfo) -> String {
    format!("{:<8} {}", provider.name, provider.models.join(", "))
}

pub fn script_card(script: &AdScript, full: bool) -> String {
    let mut card = format!(
        "#{} {}  {}",
        script.id,
        provider_label(&script.provider, &script.model),
        script.created_at.format("%Y-%m-%d %H:%M")
    );
    if let Some(platform) = &script.platform {
        card.push_str(&format!("  [{platform}]"));
    }
    card.push('\n');
    if full {
        card.push_str(&script.content);
    } else {
        card.push_str(&script_preview(&script.content));
    }
    if full {
        for reference in &script.reddit_references {
            card.push_str(&format!("\n  - {} <{}>", reference.title, reference.url));
        }
    } else if !script.reddit_references.is_empty() {
        card.push_str(&format!(
            "\n  ({} Reddit references)",
            script.reddit_references.len()
        ));
    }
    card
}
