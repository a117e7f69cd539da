//! `folio`: admin CLI for the Folio document server.
//!
//! Edits the YAML users file the server reads at startup. Passwords are
//! hashed with bcrypt before they are written; plaintext never touches disk.
//! The server must be restarted to pick up changes.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use folio_core::credentials::{DEFAULT_COST, hash_password, read_users_file, write_users_file};

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

// ── CLI structure ────────────────────────────────────────────────────

/// Folio: a tiny markdown CMS.
#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Folio CLI: manage the users allowed to sign in",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         FOLIO_USERS_FILE   Users file (default: ./users.yml)\n\n\
         {DIM}Examples:{RESET}\n  \
         folio add-user admin --password secret\n  \
         folio list-users\n  \
         folio hash-password secret --cost 10"
    ),
)]
struct Cli {
    /// Path to the YAML users file.
    #[arg(long, global = true, env = "FOLIO_USERS_FILE", default_value = "./users.yml")]
    users_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the bcrypt hash of a password.
    HashPassword {
        /// Password to hash.
        password: String,
        /// bcrypt cost factor (4-31).
        #[arg(long, default_value_t = DEFAULT_COST)]
        cost: u32,
    },
    /// Add a user, or replace the password of an existing one.
    AddUser {
        /// Username (stored lowercased).
        username: String,
        /// Password for the user.
        #[arg(long)]
        password: String,
        /// bcrypt cost factor (4-31).
        #[arg(long, default_value_t = DEFAULT_COST)]
        cost: u32,
    },
    /// Remove a user.
    RemoveUser {
        /// Username to remove.
        username: String,
    },
    /// List usernames in the users file.
    ListUsers,
}

// ── Pretty output helpers ────────────────────────────────────────────

fn header(title: &str) {
    println!("{BOLD}{CYAN}{title}{RESET}");
    println!("{DIM}─────────────────────────────────────────{RESET}");
}

fn success(msg: &str) {
    println!("{GREEN}{BOLD}✓{RESET} {msg}");
}

fn warning(msg: &str) {
    println!("{YELLOW}{BOLD}⚠{RESET} {YELLOW}{msg}{RESET}");
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("  {RED}{BOLD}✗ Error:{RESET} {e:#}");
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::HashPassword { password, cost } => cmd_hash_password(&password, cost).await,
        Commands::AddUser {
            username,
            password,
            cost,
        } => cmd_add_user(&cli.users_file, &username, &password, cost).await,
        Commands::RemoveUser { username } => cmd_remove_user(&cli.users_file, &username).await,
        Commands::ListUsers => cmd_list_users(&cli.users_file).await,
    }
}

async fn cmd_hash_password(password: &str, cost: u32) -> Result<()> {
    let hash = hash_password(password, cost)
        .await
        .context("failed to hash password")?;
    println!("{hash}");
    Ok(())
}

async fn cmd_add_user(
    users_file: &Path,
    username: &str,
    password: &str,
    cost: u32,
) -> Result<()> {
    let username = username.trim().to_lowercase();
    if username.is_empty() {
        bail!("username must not be empty");
    }
    if password.is_empty() {
        bail!("password must not be empty");
    }

    let mut users = read_users_file(users_file)
        .await
        .with_context(|| format!("failed to read {}", users_file.display()))?;
    let hash = hash_password(password, cost)
        .await
        .context("failed to hash password")?;
    let replaced = users.insert(username.clone(), hash).is_some();
    write_users_file(users_file, &users)
        .await
        .with_context(|| format!("failed to write {}", users_file.display()))?;

    if replaced {
        success(&format!("Password for '{username}' updated"));
    } else {
        success(&format!("User '{username}' added"));
    }
    Ok(())
}

async fn cmd_remove_user(users_file: &Path, username: &str) -> Result<()> {
    let mut users = read_users_file(users_file)
        .await
        .with_context(|| format!("failed to read {}", users_file.display()))?;

    let key = if users.contains_key(username) {
        username.to_owned()
    } else {
        username.to_lowercase()
    };
    if users.remove(&key).is_none() {
        bail!("no user named '{username}' in {}", users_file.display());
    }

    write_users_file(users_file, &users)
        .await
        .with_context(|| format!("failed to write {}", users_file.display()))?;
    success(&format!("User '{key}' removed"));
    Ok(())
}

async fn cmd_list_users(users_file: &Path) -> Result<()> {
    let users = read_users_file(users_file)
        .await
        .with_context(|| format!("failed to read {}", users_file.display()))?;

    if users.is_empty() {
        warning(&format!("No users in {}", users_file.display()));
        return Ok(());
    }

    header(&format!("Users ({})", users.len()));
    for name in users.keys() {
        println!("  {name}");
    }
    Ok(())
}
