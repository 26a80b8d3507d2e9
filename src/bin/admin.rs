//! CLI administration tool for orders-backend.
//!
//! Provides commands for managing accounts and tokens, viewing statistics,
//! and performing database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Create an active user (password is prompted)
//! cargo run --bin admin -- user create --email shop@mail.com --user-type shop
//!
//! # Activate a registered user without the email confirmation
//! cargo run --bin admin -- user activate name2@mail.com
//!
//! # Print (or create) the auth token of a user
//! cargo run --bin admin -- token issue name2@mail.com
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_*` components) and `TOKEN_SIGNING_SECRET`, as for the server

use orders_backend::config::{self, Config};
use orders_backend::domain::entities::{NewUser, UserType, normalize_email};
use orders_backend::infrastructure::notifier::LogNotifier;
use orders_backend::server::connect_pool;
use orders_backend::state::{AppState, Repositories};
use orders_backend::utils::password::hash_password;
use orders_backend::utils::validation::password_strength;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing orders-backend.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage auth tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum UserTypeArg {
    Buyer,
    Shop,
}

impl From<UserTypeArg> for UserType {
    fn from(arg: UserTypeArg) -> Self {
        match arg {
            UserTypeArg::Buyer => UserType::Buyer,
            UserTypeArg::Shop => UserType::Shop,
        }
    }
}

/// User management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Create an already active user
    Create {
        #[arg(short, long)]
        email: Option<String>,

        #[arg(long, value_enum, default_value = "buyer")]
        user_type: UserTypeArg,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Mark a registered user as active
    Activate {
        email: String,
    },
}

/// Token management subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Print the user's token, creating it if needed
    Issue {
        email: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &config, &pool).await?,
        Commands::Token { action } => handle_token_action(action, &config, &pool).await?,
        Commands::Stats => handle_stats(&config, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn build_state(config: &Config, pool: &PgPool) -> (Repositories, AppState) {
    let repositories = Repositories::postgres(Arc::new(pool.clone()));
    let state = AppState::new(
        repositories.clone(),
        Arc::new(LogNotifier),
        config.token_signing_secret.clone(),
    );
    (repositories, state)
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, config: &Config, pool: &PgPool) -> Result<()> {
    let (repositories, _) = build_state(config, pool);

    match action {
        UserAction::Create {
            email,
            user_type,
            yes,
        } => create_user(&repositories, email, user_type.into(), yes).await?,
        UserAction::Activate { email } => activate_user(&repositories, &email).await?,
    }

    Ok(())
}

/// Creates an active user with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for email, names, company and position
/// 2. Prompt twice for the password and check its strength
/// 3. Confirm creation (unless `--yes` flag)
/// 4. Store the Argon2 hash
async fn create_user(
    repositories: &Repositories,
    email: Option<String>,
    user_type: UserType,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let email = normalize_email(&email);

    let first_name: String = Input::new().with_prompt("First name").interact_text()?;
    let last_name: String = Input::new().with_prompt("Last name").interact_text()?;
    let company: String = Input::new()
        .with_prompt("Company")
        .allow_empty(true)
        .interact_text()?;
    let position: String = Input::new()
        .with_prompt("Position")
        .allow_empty(true)
        .interact_text()?;

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;

    if let Err(e) = password_strength(&password) {
        let reason = e
            .message
            .map(|m| m.to_string())
            .unwrap_or_else(|| e.code.to_string());
        anyhow::bail!("Weak password: {reason}");
    }

    println!();
    println!("{}", "User details:".bright_white().bold());
    println!("  Email: {}", email.cyan());
    println!("  Name:  {} {}", first_name, last_name);
    println!("  Type:  {}", user_type.to_string().cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this user?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let user = repositories
        .users
        .create(NewUser {
            email,
            password_hash,
            first_name,
            last_name,
            company,
            position,
            user_type,
            is_active: true,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!();
    println!(
        "{} (id {})",
        "✅ User created successfully!".green().bold(),
        user.id.to_string().bright_black()
    );
    println!();

    Ok(())
}

/// Activates a user by email, bypassing the confirmation token.
async fn activate_user(repositories: &Repositories, email: &str) -> Result<()> {
    let user = repositories
        .users
        .find_by_email(&normalize_email(email))
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("User not found")?;

    if user.is_active {
        println!("{}", "⚠️  This user is already active".yellow());
        return Ok(());
    }

    repositories
        .users
        .set_active(user.id, true)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to activate user: {}", e))?;

    println!("{} {}", "✅ Activated".green().bold(), user.email.cyan());

    Ok(())
}

/// Dispatches token commands.
async fn handle_token_action(action: TokenAction, config: &Config, pool: &PgPool) -> Result<()> {
    let (repositories, state) = build_state(config, pool);

    match action {
        TokenAction::Issue { email } => {
            let user = repositories
                .users
                .find_by_email(&normalize_email(&email))
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
                .context("User not found")?;

            let token = state
                .auth_service
                .get_or_create_token(&user)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to issue token: {}", e))?;

            println!("{}", "🔑 Auth Token".bright_blue().bold());
            println!();
            println!("  User:  {}", user.email.cyan());
            println!("  Token: {}", token.key.bright_yellow().bold());
            println!();
            println!("{}", "Add this to your requests:".bright_white());
            println!(
                "  {}: Token {}",
                "Authorization".bright_cyan(),
                token.key.bright_yellow()
            );
            println!();
        }
    }

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of users
/// - Total number of contacts
/// - Number of issued tokens
async fn handle_stats(config: &Config, pool: &PgPool) -> Result<()> {
    let (repositories, state) = build_state(config, pool);

    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users = state
        .user_service
        .user_count()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
    let contacts = state
        .contact_service
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
    let tokens = repositories
        .tokens
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!("  Users:    {}", users.to_string().bright_green().bold());
    println!("  Contacts: {}", contacts.to_string().bright_green().bold());
    println!("  Tokens:   {}", tokens.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
