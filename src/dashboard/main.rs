mod cli;

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use time::OffsetDateTime;

use env_monitor::client::{
    CardView, DashboardStats, EnvironmentApi, EnvironmentForm, EnvironmentStore, FormErrors,
    HttpApi,
};
use env_monitor::config::ClientConfig;
use env_monitor::models::Environment;

use cli::{Cli, Commands, CreateArgs, EditArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().context("Failed to load configuration")?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    let api = Arc::new(HttpApi::new(&config).context("Failed to create HTTP client")?);
    let store = EnvironmentStore::new(api.clone());

    match cli.command.unwrap_or(Commands::List) {
        Commands::List => {
            store.load().await.context("Failed to load environments")?;
            print_grid(&store.environments());
        }
        Commands::Show { id } => {
            let env = api.get(&id).await.context("Failed to fetch environment")?;
            println!("{}", CardView::new(&env, OffsetDateTime::now_utc()).render());
        }
        Commands::Create(args) => {
            let form = create_form(args);
            let outcome = form.submit().map_err(form_error)?;
            let env = store.save(outcome).await.context("Failed to create environment")?;
            println!("Created {}", env.id);
        }
        Commands::Edit(args) => {
            let existing = api.get(&args.id).await.context("Failed to fetch environment")?;
            let form = edit_form(&existing, args);
            let outcome = form.submit().map_err(form_error)?;
            let env = store.save(outcome).await.context("Failed to update environment")?;
            println!("{}", CardView::new(&env, OffsetDateTime::now_utc()).render());
        }
        Commands::Delete { id, yes } => {
            if !yes {
                bail!("Refusing to delete {} without --yes", id);
            }
            let existing = api.get(&id).await.context("Failed to fetch environment")?;
            let mut form = EnvironmentForm::edit(&existing);
            form.request_delete();
            if let Some(id) = form.confirm_delete() {
                store.delete(&id).await.context("Failed to delete environment")?;
                println!("Deleted {}", id);
            }
        }
    }

    Ok(())
}

fn create_form(args: CreateArgs) -> EnvironmentForm {
    let mut form = EnvironmentForm::new();
    form.url = args.url;
    form.status = args.status;
    form.name = args.name.unwrap_or_default();
    form.version = args.version.unwrap_or_default();
    form.notes = args.notes.unwrap_or_default();
    form
}

fn edit_form(existing: &Environment, args: EditArgs) -> EnvironmentForm {
    let mut form = EnvironmentForm::edit(existing);
    if let Some(url) = args.url {
        form.url = url;
    }
    if let Some(status) = args.status {
        form.status = status;
    }
    if let Some(name) = args.name {
        form.name = name;
    }
    if let Some(version) = args.version {
        form.version = version;
    }
    if let Some(notes) = args.notes {
        form.notes = notes;
    }
    form
}

fn form_error(errors: FormErrors) -> anyhow::Error {
    let messages: Vec<String> = errors
        .iter()
        .map(|(field, msg)| format!("{}: {}", field, msg))
        .collect();
    anyhow::anyhow!("Invalid input: {}", messages.join("; "))
}

fn print_grid(environments: &[Environment]) {
    let stats = DashboardStats::from_environments(environments);
    println!(
        "Total: {}  Working: {}  Degraded: {}  Down: {}",
        stats.total, stats.working, stats.degraded, stats.down
    );
    println!();

    if environments.is_empty() {
        println!("No environments yet.");
        return;
    }

    let now = OffsetDateTime::now_utc();
    for env in environments {
        println!("{}", CardView::new(env, now).render());
        println!();
    }
}
