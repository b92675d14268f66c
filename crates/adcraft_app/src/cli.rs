use std::path::PathBuf;

use adcraft_core::{GenerationRequest, JobKind, Platform};
use adcraft_engine::{CampaignChanges, NewCampaign};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "adcraft", version, about = "Generate ad content through the Adcraft API")]
pub struct Cli {
    /// RON config file; defaults to ./adcraft.ron when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL, overriding the config file.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token sent with every request.
    #[arg(long, global = true, env = "ADCRAFT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Log verbosity.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Also write logs to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start a generation job and follow it until it finishes.
    Generate(GenerateArgs),
    /// List campaigns, or create, update and delete them.
    Campaigns(CampaignsArgs),
    /// List ad scripts generated for a campaign.
    Scripts {
        #[arg(long)]
        campaign: u64,
        /// Print full script content instead of a preview.
        #[arg(long)]
        full: bool,
    },
    /// List the built-in providers and their models.
    Providers,
}

#[derive(Debug, Args)]
pub struct CampaignsArgs {
    #[command(subcommand)]
    pub action: Option<CampaignAction>,
    /// Only list campaigns whose name, niche or description contains this text.
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum CampaignAction {
    Create(NewCampaignArgs),
    Update {
        id: u64,
        #[command(flatten)]
        changes: CampaignChangeArgs,
    },
    Delete {
        id: u64,
    },
}

#[derive(Debug, Args)]
pub struct NewCampaignArgs {
    #[arg(long)]
    pub product_name: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub audience: String,
    #[arg(long)]
    pub use_cases: String,
    #[arg(long)]
    pub goal: String,
    #[arg(long)]
    pub niche: String,
}

#[derive(Debug, Args)]
pub struct CampaignChangeArgs {
    #[arg(long)]
    pub product_name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub audience: Option<String>,
    #[arg(long)]
    pub use_cases: Option<String>,
    #[arg(long)]
    pub goal: Option<String>,
    #[arg(long)]
    pub niche: Option<String>,
}

impl From<NewCampaignArgs> for NewCampaign {
    fn from(args: NewCampaignArgs) -> Self {
        Self {
            product_name: args.product_name,
            product_description: args.description,
            target_audience: args.audience,
            key_use_cases: args.use_cases,
            campaign_goal: args.goal,
            niche: args.niche,
        }
    }
}

impl From<CampaignChangeArgs> for CampaignChanges {
    fn from(args: CampaignChangeArgs) -> Self {
        Self {
            product_name: args.product_name,
            product_description: args.description,
            target_audience: args.audience,
            key_use_cases: args.use_cases,
            campaign_goal: args.goal,
            niche: args.niche,
        }
    }
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[arg(long)]
    pub campaign: u64,
    #[arg(long)]
    pub provider: String,
    #[arg(long)]
    pub model: String,
    #[arg(long, value_enum, default_value_t = KindArg::Script)]
    pub kind: KindArg,
    /// Target platform; repeat for several. Omit for all platforms.
    #[arg(long = "platform")]
    pub platforms: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Script,
    Caption,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl From<KindArg> for JobKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Script => JobKind::Script,
            KindArg::Caption => JobKind::Caption,
            KindArg::Video => JobKind::Video,
        }
    }
}

impl GenerateArgs {
    pub fn to_request(&self) -> GenerationRequest {
        let request = GenerationRequest::new(
            self.kind.into(),
            self.provider.trim().to_ascii_lowercase(),
            self.model.trim(),
            self.campaign,
        );
        if self.platforms.is_empty() {
            return request;
        }
        request.with_platforms(self.platforms.iter().map(|raw| Platform::parse(raw)).collect())
    }
}

impl Cli {
    /// Applies flag overrides on top of the file config.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
        if let Some(token) = &self.token {
            config.auth_token = Some(token.clone());
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("adcraft").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn generate_builds_request_with_platforms() {
        let cli = parse(&[
            "generate",
            "--campaign",
            "7",
            "--provider",
            "OpenAI",
            "--model",
            "gpt-4",
            "--kind",
            "caption",
            "--platform",
            "Instagram",
            "--platform",
            "tiktok",
        ]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let request = args.to_request();
        assert_eq!(request.kind, JobKind::Caption);
        assert_eq!(request.provider, "openai");
        assert_eq!(request.campaign_id, 7);
        assert_eq!(request.wire_platforms(), vec!["instagram", "tiktok"]);
    }

    #[test]
    fn generate_defaults_to_script_for_all_platforms() {
        let cli = parse(&[
            "generate", "--campaign", "1", "--provider", "groq", "--model", "llama-7b",
        ]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let request = args.to_request();
        assert_eq!(request.kind, JobKind::Script);
        assert_eq!(request.wire_platforms(), vec!["none"]);
    }

    #[test]
    fn flags_override_file_config() {
        let cli = parse(&[
            "--api-url",
            "https://api.example.com",
            "--log-file",
            "adcraft.log",
            "providers",
        ]);
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.log_file, Some(PathBuf::from("adcraft.log")));
    }

    #[test]
    fn log_level_is_validated_while_parsing() {
        let cli = parse(&["--log-level", "debug", "providers"]);
        assert_eq!(LevelFilter::from(cli.log_level), LevelFilter::Debug);
        assert_eq!(parse(&["providers"]).log_level, LogLevel::Warn);

        let err = Cli::try_parse_from(["adcraft", "--log-level", "loud", "providers"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn campaigns_search_and_write_subcommands() {
        let Command::Campaigns(args) = parse(&["campaigns", "--search", "mattress"]).command else {
            panic!("expected campaigns");
        };
        assert_eq!(args.search.as_deref(), Some("mattress"));
        assert!(args.action.is_none());

        let Command::Campaigns(args) =
            parse(&["campaigns", "update", "9", "--niche", "Home"]).command
        else {
            panic!("expected campaigns");
        };
        let Some(CampaignAction::Update { id, changes }) = args.action else {
            panic!("expected update");
        };
        assert_eq!(id, 9);
        assert_eq!(
            CampaignChanges::from(changes),
            CampaignChanges {
                niche: Some("Home".to_string()),
                ..CampaignChanges::default()
            }
        );

        let Command::Campaigns(args) = parse(&[
            "campaigns",
            "create",
            "--product-name",
            "SleepWell Mattress",
            "--description",
            "Memory foam",
            "--audience",
            "Adults",
            "--use-cases",
            "Sleep",
            "--goal",
            "Sales",
            "--niche",
            "Wellness",
        ])
        .command
        else {
            panic!("expected campaigns");
        };
        let Some(CampaignAction::Create(new)) = args.action else {
            panic!("expected create");
        };
        assert_eq!(NewCampaign::from(new).product_description, "Memory foam");

        assert!(Cli::try_parse_from(["adcraft", "campaigns", "create", "--niche", "x"]).is_err());
    }

    #[test]
    fn scripts_requires_campaign() {
        assert!(Cli::try_parse_from(["adcraft", "scripts"]).is_err());
    }
}
