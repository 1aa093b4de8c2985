//! HRMS Lite CLI
//!
//! Terminal client for the HRMS Lite backend:
//! - Dashboard overview
//! - Employee management
//! - Attendance tracking

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use hrms_lite::client::HttpClient;
use hrms_lite::config::{generate_default_config, Config};
use hrms_lite::models::AttendanceStatus;
use hrms_lite::shell::{AssumeYes, EmployeeFields, OutputFormat, Shell};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "hrms")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Employee records and daily attendance")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides config and HRMS_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: platform config dir, then ./hrms.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show totals and the most recent employees and attendance
    Dashboard,

    /// Manage employees
    #[command(subcommand)]
    Employees(EmployeeCommands),

    /// Track attendance
    #[command(subcommand)]
    Attendance(AttendanceCommands),

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum EmployeeCommands {
    /// List employees
    List {
        /// Filter by name or employee ID
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one employee
    Show { employee_id: String },

    /// Add an employee
    Add {
        #[command(flatten)]
        fields: EmployeeFields,
    },

    /// Edit an employee; omitted fields keep their current value
    Edit {
        /// Employee to edit
        target: String,
        #[command(flatten)]
        fields: EmployeeFields,
    },

    /// Delete an employee and all of their attendance
    Delete {
        employee_id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum AttendanceCommands {
    /// List attendance records, newest first
    List {
        /// Only this date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Only this employee
        #[arg(short, long)]
        employee: Option<String>,
        /// Filter by employee name or ID
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Mark attendance for an employee
    Mark {
        #[arg(short, long)]
        employee: Option<String>,
        /// Date (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// present or absent
        #[arg(short, long, default_value = "present")]
        status: AttendanceStatus,
    },

    /// Show an employee's attendance summary
    Summary { employee_id: String },

    /// Show every record for one employee
    History { employee_id: String },

    /// Delete one attendance record
    Delete {
        record_id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match Config::load_with_env(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config);

    if let Err(e) = run(cli, config).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "hrms_lite={level},hrms={level}",
            level = config.logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating {:?}", parent))?;
                }
                std::fs::write(path, &content).with_context(|| format!("writing {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    tracing::debug!(base_url = %config.api.base_url, "Using backend");
    let client = HttpClient::from_config(&config.api).context("creating HTTP client")?;
    let mut shell = Shell::new(Arc::new(client), &config, cli.format, io::stdout(), io::stderr());

    let result = match cli.command {
        Commands::Dashboard => shell.dashboard().await,

        Commands::Employees(command) => match command {
            EmployeeCommands::List { search } => shell.employees_list(search.as_deref()).await,
            EmployeeCommands::Show { employee_id } => shell.employees_show(&employee_id).await,
            EmployeeCommands::Add { fields } => shell.employees_add(&fields).await,
            EmployeeCommands::Edit { target, fields } => {
                shell.employees_edit(&target, &fields).await
            }
            EmployeeCommands::Delete { employee_id, yes } => {
                if yes {
                    shell = shell.with_confirm(AssumeYes);
                }
                shell.employees_delete(&employee_id).await
            }
        },

        Commands::Attendance(command) => match command {
            AttendanceCommands::List {
                date,
                employee,
                search,
            } => shell.attendance_list(date, employee, search.as_deref()).await,
            AttendanceCommands::Mark {
                employee,
                date,
                status,
            } => shell.attendance_mark(employee, date, status).await,
            AttendanceCommands::Summary { employee_id } => {
                shell.attendance_summary(&employee_id).await
            }
            AttendanceCommands::History { employee_id } => {
                shell.attendance_history(&employee_id).await
            }
            AttendanceCommands::Delete { record_id, yes } => {
                if yes {
                    shell = shell.with_confirm(AssumeYes);
                }
                shell.attendance_delete(&record_id).await
            }
        },

        Commands::Config { .. } => Ok(()),
    };

    match result {
        Ok(()) => Ok(()),
        // Already on screen; only the exit status is left to set
        Err(e) if e.already_reported() => std::process::exit(1),
        Err(e) => Err(e.into()),
    }
}
