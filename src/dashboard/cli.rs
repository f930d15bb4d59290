use clap::{Args, Parser, Subcommand};

use env_monitor::models::EnvironmentStatus;

#[derive(Debug, Parser)]
#[command(name = "dashboard")]
#[command(about = "Terminal dashboard for the Environment Monitor API")]
pub struct Cli {
    #[arg(long, help = "Base API URL; overrides API_URL.")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Show the stats bar and every environment card (default).")]
    List,
    #[command(about = "Show one environment.")]
    Show { id: String },
    #[command(about = "Create a new environment.")]
    Create(CreateArgs),
    #[command(about = "Edit an existing environment. Pass an empty value to clear a field.")]
    Edit(EditArgs),
    #[command(about = "Delete an environment.")]
    Delete {
        id: String,
        #[arg(long, help = "Confirm the deletion.")]
        yes: bool,
    },
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long, help = "IP address or URL.")]
    pub url: String,
    #[arg(long, default_value = "working", help = "working, degraded or down.")]
    pub status: EnvironmentStatus,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub version: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long, help = "working, degraded or down.")]
    pub status: Option<EnvironmentStatus>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub version: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}
