use std::io::{self, Write};
use std::sync::Arc;

use adcraft_core::{providers, Outcome};
use adcraft_engine::{
    campaign_matches, CampaignChanges, ChannelObserver, HttpJobBackend, NewCampaign, SessionEvent,
    SessionHandle,
};
use adcraft_logging::{adcraft_info, adcraft_warn};
use anyhow::{bail, Context, Result};

use crate::cli::{CampaignAction, CampaignsArgs, Command, GenerateArgs};
use crate::config::AppConfig;
use crate::render;

pub async fn execute(command: Command, config: &AppConfig) -> Result<()> {
    match command {
        Command::Generate(args) => generate(&args, config).await,
        Command::Campaigns(args) => campaigns(args, config).await,
        Command::Scripts { campaign, full } => list_scripts(config, campaign, full).await,
        Command::Providers => {
            for provider in providers() {
                println!("{}", render::provider_line(provider));
            }
            Ok(())
        }
    }
}

fn backend(config: &AppConfig) -> Result<HttpJobBackend> {
    HttpJobBackend::new(config.backend_settings()).context("building HTTP client")
}

async fn generate(args: &GenerateArgs, config: &AppConfig) -> Result<()> {
    let request = args.to_request();
    let backend = Arc::new(backend(config)?);
    let (observer, mut events) = ChannelObserver::channel();
    let session = SessionHandle::spawn(backend, config.session_config(), Arc::new(observer));

    adcraft_info!(
        "Generating {} for campaign {} with {}/{}",
        request.kind,
        request.campaign_id,
        request.provider,
        request.model
    );
    session.start(request);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let outcome = loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(SessionEvent::Progress { percent, message }) => {
                    eprint!("\r{}", render::progress_line(percent, &message));
                    let _ = io::stderr().flush();
                }
                Some(SessionEvent::Terminal(outcome)) => break Some(outcome),
                None => break None,
            },
            _ = &mut ctrl_c => {
                adcraft_warn!("Interrupted; cancelling generation");
                session.cancel();
                break None;
            }
        }
    };
    eprintln!();
    session.shutdown().await;

    match outcome {
        Some(outcome @ Outcome::Completed(_)) => {
            println!("{}", render::outcome_line(&outcome));
            Ok(())
        }
        Some(Outcome::Failed(reason)) => bail!("generation failed [{}]: {reason}", reason.code()),
        None => {
            println!("Cancelled.");
            Ok(())
        }
    }
}

async fn campaigns(args: CampaignsArgs, config: &AppConfig) -> Result<()> {
    let backend = backend(config)?;
    match args.action {
        None => list_campaigns(&backend, args.search.as_deref()).await,
        Some(CampaignAction::Create(fields)) => {
            let campaign = backend
                .create_campaign(&NewCampaign::from(fields))
                .await
                .context("creating campaign")?;
            println!("Created {}", render::campaign_line(&campaign));
            Ok(())
        }
        Some(CampaignAction::Update { id, changes }) => {
            let changes = CampaignChanges::from(changes);
            if changes.is_empty() {
                bail!("nothing to update for campaign {id}; pass at least one field");
            }
            let campaign = backend
                .update_campaign(id, &changes)
                .await
                .with_context(|| format!("updating campaign {id}"))?;
            println!("Updated {}", render::campaign_line(&campaign));
            Ok(())
        }
        Some(CampaignAction::Delete { id }) => {
            backend
                .delete_campaign(id)
                .await
                .with_context(|| format!("deleting campaign {id}"))?;
            println!("Deleted campaign #{id}");
            Ok(())
        }
    }
}

async fn list_campaigns(backend: &HttpJobBackend, search: Option<&str>) -> Result<()> {
    let campaigns = backend.list_campaigns().await.context("listing campaigns")?;
    let query = search.unwrap_or_default();
    let matching: Vec<_> = campaigns
        .iter()
        .filter(|campaign| campaign_matches(campaign, query))
        .collect();

    if campaigns.is_empty() {
        println!("No campaigns yet.");
    } else if matching.is_empty() {
        println!("No campaigns match {query:?}.");
    }
    for campaign in matching {
        println!("{}", render::campaign_line(campaign));
    }
    Ok(())
}

async fn list_scripts(config: &AppConfig, campaign_id: u64, full: bool) -> Result<()> {
    let backend = backend(config)?;
    let campaign = backend
        .get_campaign(campaign_id)
        .await
        .with_context(|| format!("loading campaign {campaign_id}"))?;
    let scripts = backend
        .ad_scripts_for_campaign(campaign_id)
        .await
        .with_context(|| format!("listing scripts for campaign {campaign_id}"))?;

    println!("{}", render::campaign_line(&campaign));
    if scripts.is_empty() {
        println!("No scripts generated yet.");
    }
    for script in &scripts {
        println!("\n{}", render::script_card(script, full));
    }
    Ok(())
}
