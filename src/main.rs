//! CLI entry point for marketo-api: look up and manage Marketo assets from
//! the shell.
//!
//! Settings are resolved per field in this order: command-line flags, then
//! `MARKETO_*` environment variables, then the `--config` JSON file.
//! Results are printed to stdout as pretty JSON. Logs go to stderr and are
//! controlled by `RUST_LOG` (default `warn`).
//!
//! Exit codes:
//! - 0: success
//! - 1: runtime error (config, auth, API error) or no matching asset
//! - 2: argument validation error (clap handles this automatically)

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use marketo_api::channels::{browse_channels, get_channels_by_name};
use marketo_api::email_templates::{
    browse_email_templates, get_email_template_by_id, get_email_template_by_name,
};
use marketo_api::emails::{EmailFilter, browse_emails, get_email_by_id, get_email_by_name};
use marketo_api::entity::{FolderId, Tag};
use marketo_api::folders::{
    FolderUpdate, browse_folders, create_folder, delete_folder, get_folder_by_id,
    get_folder_by_name, update_folder,
};
use marketo_api::params::Page;
use marketo_api::programs::{
    ProgramFilter, approve_program, browse_programs, delete_program, get_program_by_id,
    get_program_by_name, get_programs_by_tag, unapprove_program,
};
use marketo_api::smart_campaigns::{get_smart_campaign_by_id, get_smart_campaign_by_name};
use marketo_api::tags::{browse_tag_types, get_tag_type_by_name};
use marketo_api::{ClientConfig, MarketoClient};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON config file with restBaseUrl, identityBaseUrl, clientId, clientSecret.
    #[arg(long)]
    config: Option<PathBuf>,

    /// REST base URL, e.g. https://123-ABC-456.mktorest.com/rest
    #[arg(long)]
    rest_base_url: Option<String>,

    /// Identity base URL, e.g. https://123-ABC-456.mktorest.com/identity
    #[arg(long)]
    identity_base_url: Option<String>,

    #[arg(long)]
    client_id: Option<String>,

    /// Prefer MARKETO_CLIENT_SECRET to keep the secret out of shell history.
    #[arg(long)]
    client_secret: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Folder lookups and management.
    #[command(subcommand)]
    Folder(FolderCommand),
    /// Email lookups.
    #[command(subcommand)]
    Email(EmailCommand),
    /// Email template lookups.
    #[command(subcommand)]
    Template(TemplateCommand),
    /// Program lookups and lifecycle.
    #[command(subcommand)]
    Program(ProgramCommand),
    /// Smart campaign lookups.
    #[command(subcommand)]
    Campaign(CampaignCommand),
    /// Tag type lookups.
    #[command(subcommand)]
    Tag(NamedListCommand),
    /// Channel lookups.
    #[command(subcommand)]
    Channel(NamedListCommand),
}

/// Identify an asset by id or by name. Exactly one is required.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct Lookup {
    #[arg(long)]
    id: Option<i64>,
    #[arg(long)]
    name: Option<String>,
}

#[derive(Args)]
struct PageArgs {
    #[arg(long)]
    max_return: Option<u32>,
    #[arg(long)]
    offset: Option<u32>,
}

impl PageArgs {
    fn page(&self) -> Page {
        Page {
            max_return: self.max_return,
            offset: self.offset,
        }
    }
}

#[derive(Subcommand)]
enum FolderCommand {
    Get {
        #[command(flatten)]
        lookup: Lookup,
    },
    /// List the children of a folder.
    Browse {
        #[arg(long)]
        root_id: i64,
        /// Treat the root id as a program rather than a folder.
        #[arg(long)]
        program: bool,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        parent_id: i64,
        #[arg(long)]
        description: Option<String>,
    },
    Rename {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Subcommand)]
enum EmailCommand {
    Get {
        #[command(flatten)]
        lookup: Lookup,
    },
    Browse {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        folder_id: Option<i64>,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand)]
enum TemplateCommand {
    Get {
        #[command(flatten)]
        lookup: Lookup,
    },
    Browse {
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand)]
enum ProgramCommand {
    Get {
        #[command(flatten)]
        lookup: Lookup,
        /// Include tags (name lookups only).
        #[arg(long)]
        include_tags: bool,
        /// Include period costs (name lookups only).
        #[arg(long)]
        include_costs: bool,
    },
    Browse {
        #[arg(long)]
        status: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    ByTag {
        #[arg(long)]
        tag_type: String,
        #[arg(long)]
        tag_value: String,
        #[command(flatten)]
        page: PageArgs,
    },
    Approve {
        #[arg(long)]
        id: i64,
    },
    Unapprove {
        #[arg(long)]
        id: i64,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Subcommand)]
enum CampaignCommand {
    Get {
        #[command(flatten)]
        lookup: Lookup,
    },
}

#[derive(Subcommand)]
enum NamedListCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    Get {
        #[arg(long)]
        name: String,
    },
}

impl Cli {
    fn client_config(&self) -> marketo_api::Result<ClientConfig> {
        let flags = ClientConfig {
            rest_base_url: self.rest_base_url.clone(),
            identity_base_url: self.identity_base_url.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
        };
        let file = match &self.config {
            Some(path) => ClientConfig::from_json_file(path)?,
            None => ClientConfig::default(),
        };
        Ok(flags.or(ClientConfig::from_env()).or(file))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn emit<T: Serialize>(value: &T) -> marketo_api::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints a lookup result. `Ok(false)` means nothing matched.
fn emit_found<T: Serialize>(value: Option<T>) -> marketo_api::Result<bool> {
    match value {
        Some(v) => emit(&v).map(|_| true),
        None => Ok(false),
    }
}

async fn run(cli: &Cli) -> marketo_api::Result<bool> {
    let client = MarketoClient::new(cli.client_config()?)?;
    client.authenticate().await?;

    match &cli.command {
        Command::Folder(cmd) => match cmd {
            FolderCommand::Get { lookup } => {
                let folder = match (&lookup.id, &lookup.name) {
                    (Some(id), _) => get_folder_by_id(&client, *id).await?,
                    (None, Some(name)) => get_folder_by_name(&client, name, None).await?,
                    (None, None) => None,
                };
                emit_found(folder)
            }
            FolderCommand::Browse { root_id, program } => {
                let root = if *program {
                    FolderId::program(*root_id)
                } else {
                    FolderId::folder(*root_id)
                };
                emit(&browse_folders(&client, &root).await?).map(|_| true)
            }
            FolderCommand::Create {
                name,
                parent_id,
                description,
            } => {
                let parent = FolderId::folder(*parent_id);
                let folder = create_folder(&client, name, &parent, description.as_deref()).await?;
                emit(&folder).map(|_| true)
            }
            FolderCommand::Rename { id, name } => {
                let update = FolderUpdate {
                    name: Some(name.clone()),
                    ..FolderUpdate::default()
                };
                emit(&update_folder(&client, *id, &update).await?).map(|_| true)
            }
            FolderCommand::Delete { id } => {
                emit(&delete_folder(&client, *id).await?).map(|_| true)
            }
        },
        Command::Email(cmd) => match cmd {
            EmailCommand::Get { lookup } => {
                let email = match (&lookup.id, &lookup.name) {
                    (Some(id), _) => get_email_by_id(&client, *id).await?,
                    (None, Some(name)) => get_email_by_name(&client, name, None).await?,
                    (None, None) => None,
                };
                emit_found(email)
            }
            EmailCommand::Browse {
                status,
                folder_id,
                page,
            } => {
                let filter = EmailFilter {
                    status: status.clone(),
                    folder: folder_id.map(FolderId::folder),
                    page: page.page(),
                };
                emit(&browse_emails(&client, &filter).await?).map(|_| true)
            }
        },
        Command::Template(cmd) => match cmd {
            TemplateCommand::Get { lookup } => {
                let template = match (&lookup.id, &lookup.name) {
                    (Some(id), _) => get_email_template_by_id(&client, *id).await?,
                    (None, Some(name)) => get_email_template_by_name(&client, name).await?,
                    (None, None) => None,
                };
                emit_found(template)
            }
            TemplateCommand::Browse { page } => {
                emit(&browse_email_templates(&client, &page.page()).await?).map(|_| true)
            }
        },
        Command::Program(cmd) => match cmd {
            ProgramCommand::Get {
                lookup,
                include_tags,
                include_costs,
            } => {
                let program = match (&lookup.id, &lookup.name) {
                    (Some(id), _) => get_program_by_id(&client, *id).await?,
                    (None, Some(name)) => {
                        get_program_by_name(&client, name, *include_tags, *include_costs).await?
                    }
                    (None, None) => None,
                };
                emit_found(program)
            }
            ProgramCommand::Browse { status, page } => {
                let filter = ProgramFilter {
                    status: status.clone(),
                    page: page.page(),
                    ..ProgramFilter::default()
                };
                emit(&browse_programs(&client, &filter).await?).map(|_| true)
            }
            ProgramCommand::ByTag {
                tag_type,
                tag_value,
                page,
            } => {
                let tag = Tag::new(tag_type, tag_value);
                emit(&get_programs_by_tag(&client, &tag, &page.page()).await?).map(|_| true)
            }
            ProgramCommand::Approve { id } => {
                emit(&approve_program(&client, *id).await?).map(|_| true)
            }
            ProgramCommand::Unapprove { id } => {
                emit(&unapprove_program(&client, *id).await?).map(|_| true)
            }
            ProgramCommand::Delete { id } => {
                emit(&delete_program(&client, *id).await?).map(|_| true)
            }
        },
        Command::Campaign(CampaignCommand::Get { lookup }) => {
            let campaign = match (&lookup.id, &lookup.name) {
                (Some(id), _) => get_smart_campaign_by_id(&client, *id).await?,
                (None, Some(name)) => get_smart_campaign_by_name(&client, name).await?,
                (None, None) => None,
            };
            emit_found(campaign)
        }
        Command::Tag(cmd) => match cmd {
            NamedListCommand::List { page } => {
                emit(&browse_tag_types(&client, &page.page()).await?).map(|_| true)
            }
            NamedListCommand::Get { name } => emit_found(get_tag_type_by_name(&client, name).await?),
        },
        Command::Channel(cmd) => match cmd {
            NamedListCommand::List { page } => {
                emit(&browse_channels(&client, &page.page()).await?).map(|_| true)
            }
            NamedListCommand::Get { name } => {
                let channels = get_channels_by_name(&client, name, &Page::default()).await?;
                if channels.is_empty() {
                    return Ok(false);
                }
                emit(&channels).map(|_| true)
            }
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match failure_message(run(&cli).await) {
        None => ExitCode::SUCCESS,
        Some(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

/// The stderr line for a failed run, or `None` on success. Every failure
/// exits with status 1.
fn failure_message(outcome: marketo_api::Result<bool>) -> Option<String> {
    match outcome {
        Ok(true) => None,
        Ok(false) => Some("No matching asset found".to_string()),
        Err(e) => Some(format!("Error: {e}")),
    }
}
