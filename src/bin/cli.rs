use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use orca::{
    config::AppConfig,
    db,
    models::user::{Role, User},
    repositories::user_repository::SqliteUserRepository,
    services::user_service::{CreateUserRequest, UserService},
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "orca-cli")]
#[command(about = "Administer Orca accounts from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,

        /// editor or viewer
        #[arg(short, long, default_value = "viewer")]
        role: Role,
    },

    /// List all users
    List,

    /// Prevent a user from logging in
    Block {
        #[arg(short, long)]
        email: String,
    },

    /// Allow a blocked user to log in again
    Unblock {
        #[arg(short, long)]
        email: String,
    },

    /// Delete a user
    Delete {
        #[arg(short, long)]
        email: String,
    },
}

fn prompt_password() -> anyhow::Result<String> {
    use std::io::{self, Write};

    print!("Password: ");
    io::stdout().flush()?;
    let password = rpassword::read_password()?;

    print!("Confirm password: ");
    io::stdout().flush()?;
    let confirm = rpassword::read_password()?;

    if password != confirm {
        bail!("Passwords do not match");
    }
    Ok(password)
}

async fn require_user(user_service: &UserService, email: &str) -> anyhow::Result<User> {
    user_service
        .find_user_by_email(email)
        .await?
        .with_context(|| format!("User '{}' not found", email))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    db::migrate(&pool).await?;

    let user_repository = Arc::new(SqliteUserRepository::new(pool));
    let user_service = UserService::new(user_repository);

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::Create {
                name,
                email,
                password,
                role,
            } => {
                let password = match password {
                    Some(pw) => pw,
                    None => prompt_password()?,
                };

                let user = user_service
                    .create_user(CreateUserRequest {
                        name,
                        email,
                        password,
                        role,
                    })
                    .await
                    .context("Failed to create user")?;

                println!("✅ User created");
                println!("  ID: {}", user.id);
                println!("  Email: {}", user.email);
                println!("  Role: {}", user.role);
            }

            UserCommands::List => {
                let users = user_service.list_users().await?;
                if users.is_empty() {
                    println!("No users found.");
                } else {
                    println!(
                        "{:<5} {:<25} {:<35} {:<8} {:<8}",
                        "ID", "Name", "Email", "Role", "Active"
                    );
                    println!("{}", "-".repeat(83));
                    for user in users {
                        println!(
                            "{:<5} {:<25} {:<35} {:<8} {:<8}",
                            user.id,
                            user.name,
                            user.email,
                            user.role,
                            if user.active { "yes" } else { "no" }
                        );
                    }
                }
            }

            UserCommands::Block { email } => {
                let user = require_user(&user_service, &email).await?;
                user_service.set_active(user.id, false).await?;
                println!("✅ User '{}' blocked", email);
            }

            UserCommands::Unblock { email } => {
                let user = require_user(&user_service, &email).await?;
                user_service.set_active(user.id, true).await?;
                println!("✅ User '{}' unblocked", email);
            }

            UserCommands::Delete { email } => {
                let user = require_user(&user_service, &email).await?;
                user_service.delete_user(user.id).await?;
                println!("✅ User '{}' deleted", email);
            }
        },
    }

    Ok(())
}
