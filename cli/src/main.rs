mod storage;
mod transport;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use roster_session::{AuthAction, AuthClient, AuthClientError, AuthPhase, AuthStore};
use serde::Serialize;

use crate::storage::FileStorage;
use crate::transport::ReqwestTransport;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("not logged in; run `roster login` first")]
    NotLoggedIn,
    #[error("health check failed: HTTP {0}")]
    HealthCheck(u16),
    #[error("session rejected: {0}")]
    SessionRejected(String),
    #[error("{0}")]
    Api(#[from] AuthClientError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("state file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "roster", about = "Roster user management CLI")]
struct Cli {
    #[arg(long, env = "ROSTER_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Where the session token and cached profile are kept between runs.
    #[arg(long, env = "ROSTER_STATE_FILE", default_value = ".roster-session.json")]
    state_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check `/healthz`.
    Ping,
    /// Sign in and store the session token.
    Login {
        /// Username or email.
        login: String,
        #[arg(long, env = "ROSTER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Revoke the stored session and forget it.
    Logout,
    /// Validate the stored session and print the signed-in user.
    Whoami,
    Users(UsersCommand),
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List,
    Delete { id: String },
    SetRole { id: String, role: String },
}

struct CliContext {
    base_url: String,
    client: AuthClient<ReqwestTransport>,
    store: AuthStore<FileStorage>,
}

impl CliContext {
    fn token(&self) -> Result<String, CliError> {
        self.store.tokens().token().ok_or(CliError::NotLoggedIn)
    }

    fn save(&self) -> Result<(), CliError> {
        self.store.storage().save()
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let base_url = cli.base_url.trim_end_matches('/').to_owned();
    let mut ctx = CliContext {
        client: AuthClient::new(format!("{base_url}/api"), ReqwestTransport::new(reqwest::Client::new())),
        store: AuthStore::new(FileStorage::open(cli.state_file)?),
        base_url,
    };

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Login { login, password } => run_login(&mut ctx, &login, &password).await,
        Command::Logout => run_logout(&mut ctx).await,
        Command::Whoami => run_whoami(&mut ctx).await,
        Command::Users(users) => run_users(&ctx, users).await,
    }
}

async fn run_ping(ctx: &CliContext) -> Result<(), CliError> {
    let response = reqwest::Client::new().get(format!("{}/healthz", ctx.base_url)).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::HealthCheck(status.as_u16()));
    }
    println!("ok");
    Ok(())
}

async fn run_login(ctx: &mut CliContext, login: &str, password: &str) -> Result<(), CliError> {
    let session = ctx.client.login(login, password).await?;
    let user = session.user.clone();
    ctx.store.dispatch(AuthAction::CredentialsSet { user: session.user, token: session.token });
    ctx.save()?;
    eprintln!("session saved to {}", ctx.store.storage().path().display());
    print_json(&user)
}

async fn run_logout(ctx: &mut CliContext) -> Result<(), CliError> {
    let token = ctx.token()?;
    // The local session is dropped even if the server call fails.
    if let Err(e) = ctx.client.logout(&token).await {
        eprintln!("warning: server logout failed: {e}");
    }
    ctx.store.dispatch(AuthAction::Logout);
    ctx.save()?;
    println!("logged out");
    Ok(())
}

async fn run_whoami(ctx: &mut CliContext) -> Result<(), CliError> {
    if ctx.store.state().phase() == AuthPhase::Anonymous {
        return Err(CliError::NotLoggedIn);
    }
    let phase = ctx.store.load_current_user(&ctx.client).await;
    ctx.save()?;
    match (phase, ctx.store.state().user()) {
        (AuthPhase::Authenticated, Some(user)) => print_json(user),
        _ => {
            let message = ctx.store.state().error().unwrap_or(roster_session::state::LOAD_FAILED_MESSAGE);
            Err(CliError::SessionRejected(message.to_owned()))
        }
    }
}

async fn run_users(ctx: &CliContext, users: UsersCommand) -> Result<(), CliError> {
    let token = ctx.token()?;
    match users.command {
        UsersSubcommand::List => print_json(&ctx.client.list_users(&token).await?),
        UsersSubcommand::Delete { id } => print_json(&ctx.client.delete_user(&token, &id).await?),
        UsersSubcommand::SetRole { id, role } => print_json(&ctx.client.update_role(&token, &id, &role).await?),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
