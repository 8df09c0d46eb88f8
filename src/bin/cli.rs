use authgate::{
    config::ServerConfig,
    db,
    models::User,
    services::user_service::{CreateUserRequest, UpdatePasswordRequest, UserService},
    AppState,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "authgate-cli")]
#[command(about = "CLI tool for managing authgate user accounts", long_about = None)]
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
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List all users
    List {
        /// Maximum number of users to display
        #[arg(short, long, default_value_t = 100)]
        limit: i64,

        /// Offset for pagination
        #[arg(short = 'o', long, default_value_t = 0)]
        offset: i64,
    },

    /// Delete a user
    Delete {
        /// Email address of the user to delete
        #[arg(short, long)]
        email: String,
    },

    /// Set a new password for a user
    SetPassword {
        /// Email address of the user
        #[arg(short, long)]
        email: String,

        /// New password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn get_password(prompt: &str) -> CliResult<String> {
    Ok(rpassword::prompt_password(format!("{}: ", prompt))?)
}

/// Use the password given on the command line, or prompt twice for it.
fn password_pair(given: Option<String>, prompt: &str) -> CliResult<(String, String)> {
    match given {
        Some(pw) => Ok((pw.clone(), pw)),
        None => {
            let password = get_password(prompt)?;
            let confirm = get_password("Confirm password")?;
            Ok((password, confirm))
        }
    }
}

async fn find_user(service: &UserService, email: &str) -> CliResult<User> {
    service
        .find_user_by_email(email)
        .await?
        .ok_or_else(|| format!("User '{}' not found", email).into())
}

async fn run(service: &UserService, command: UserCommands) -> CliResult<()> {
    match command {
        UserCommands::Create {
            email,
            name,
            password,
        } => {
            let (password, password_confirm) = password_pair(password, "Password")?;
            let user = service
                .create_user(CreateUserRequest {
                    email,
                    name,
                    password,
                    password_confirm: Some(password_confirm),
                })
                .await?;

            println!("User created successfully!");
            println!("  ID: {}", user.id);
            println!("  Email: {}", user.email);
            println!("  Name: {}", user.name);
        }

        UserCommands::List { limit, offset } => {
            let users = service.list_users(Some(limit), Some(offset)).await?;
            if users.is_empty() {
                println!("No users found.");
                return Ok(());
            }

            println!("{:<5} {:<40} {:<25} {:<20}", "ID", "Email", "Name", "Created");
            println!("{}", "-".repeat(90));
            for user in users {
                println!(
                    "{:<5} {:<40} {:<25} {:<20}",
                    user.id,
                    user.email,
                    user.name,
                    user.created_at.as_deref().unwrap_or("N/A")
                );
            }
        }

        UserCommands::Delete { email } => {
            let user = find_user(service, &email).await?;
            service.delete_user(user.id).await?;
            println!("User '{}' deleted successfully!", email);
        }

        UserCommands::SetPassword { email, password } => {
            let user = find_user(service, &email).await?;
            let (new_password, password_confirm) = password_pair(password, "New password")?;
            service
                .update_password(UpdatePasswordRequest {
                    user_id: user.id,
                    new_password,
                    new_password_confirm: Some(password_confirm),
                })
                .await?;
            println!("Password updated successfully for '{}'!", email);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> CliResult<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    let config = ServerConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    let state = AppState::from_pool(pool);

    let Commands::User { command } = cli.command;
    if let Err(err) = run(&state.user_service, command).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    Ok(())
}
