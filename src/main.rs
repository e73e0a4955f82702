use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use petquest::api::HttpTransport;
use petquest::app::App;
use petquest::config::Config;
use petquest::logging;
use petquest::ui::install_panic_hook;
use petquest::wizard::{Field, Wizard, WizardStep};

#[derive(Parser)]
#[command(name = "petquest")]
#[command(about = "Guided walkthrough of the pet/account API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Override the API base URL
    #[arg(long)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the wizard steps and the request each one sends
    Steps,

    /// Run the whole walkthrough without the TUI and print the transcript
    Run {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        age: u32,

        #[arg(long)]
        pet_name: String,

        #[arg(long)]
        pet_type: String,

        /// Role requested at the role-change step
        #[arg(long, default_value = "admin")]
        role: String,

        /// Username to switch to at the update step (default: <username>-renamed)
        #[arg(long)]
        new_username: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }

    let is_tui_mode = cli.command.is_none();
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::Steps) => cmd_steps(),
        Some(Commands::Run {
            username,
            password,
            age,
            pet_name,
            pet_type,
            role,
            new_username,
        }) => {
            let new_username = new_username.unwrap_or_else(|| format!("{}-renamed", username));
            let values = [
                (Field::Username, username),
                (Field::Password, password),
                (Field::Age, age.to_string()),
                (Field::PetName, pet_name),
                (Field::PetType, pet_type),
                (Field::Role, role),
            ];
            cmd_run(&config, values, new_username).await?;
        }
        None => {
            run_tui(config, logging_handle.log_file_path).await?;
        }
    }

    Ok(())
}

async fn run_tui(config: Config, log_file_path: Option<PathBuf>) -> Result<()> {
    install_panic_hook();

    let mut app = App::new(config)?;
    let result = app.run().await;

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

fn cmd_steps() {
    println!("{:>4}  {:<30} {:<7} PATH", "STEP", "TITLE", "METHOD");
    for step in WizardStep::all() {
        let (method, path) = match step.operation() {
            Some(op) => (op.method().as_str(), op.path_template()),
            None => ("-", "-"),
        };
        println!(
            "{:>4}  {:<30} {:<7} {}",
            step.number(),
            step.title(),
            method,
            path
        );
    }
}

async fn cmd_run(
    config: &Config,
    values: [(Field, String); 6],
    new_username: String,
) -> Result<()> {
    let transport = HttpTransport::from_config(config).context("Failed to create HTTP client")?;
    println!("Running walkthrough against {}", transport.base_url());
    println!();

    let mut wizard = Wizard::new();
    for (field, value) in values {
        wizard.set_field(field, value);
    }

    while !wizard.is_finished() {
        let step = wizard.step();
        if step == WizardStep::UpdateUsername {
            wizard.set_field(Field::Username, new_username.as_str());
        }

        wizard
            .submit(&transport)
            .await
            .with_context(|| format!("Step {} could not be submitted", step.number()))?;

        if let Some(entry) = wizard.transcript().last() {
            println!("[{:>2}] {}", step.number(), step.title());
            for line in entry.text.lines() {
                println!("     {}", line);
            }
            println!();
        }
    }

    println!("Completed {} steps.", wizard.transcript().len());
    Ok(())
}
