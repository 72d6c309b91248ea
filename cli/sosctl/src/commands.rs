//! CLI commands.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use sos_api::auth::password;
use sos_api::db::{Database, DbConfig};
use sos_api::domain::Role;

/// SOS relief platform operator CLI.
#[derive(Debug, Parser)]
#[command(name = "sosctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Database connection URL.
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create an admin user, or promote an existing one.
    CreateAdmin(CreateAdminArgs),

    /// Set a user's role by email.
    SetRole(SetRoleArgs),

    /// List all users.
    ListUsers,

    /// Check database connectivity and migrations.
    DbCheck,
}

#[derive(Debug, Args)]
struct CreateAdminArgs {
    /// Admin email address.
    #[arg(long)]
    email: String,

    /// Display name.
    #[arg(long, default_value = "Admin")]
    name: String,

    /// Password for the credential account (only used when creating).
    #[arg(long)]
    password: String,
}

#[derive(Debug, Args)]
struct SetRoleArgs {
    /// Email of the user to update.
    #[arg(long)]
    email: String,

    /// New role: citizen, volunteer, or admin.
    #[arg(long)]
    role: String,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut db_config = DbConfig::from_env();
        if let Some(url) = &self.database_url {
            db_config.database_url = url.clone();
        }

        let db = Database::connect(&db_config)
            .await
            .context("failed to connect to database")?;

        match self.command {
            Commands::CreateAdmin(args) => create_admin(&db, args).await,
            Commands::SetRole(args) => set_role(&db, args).await,
            Commands::ListUsers => list_users(&db).await,
            Commands::DbCheck => db_check(&db).await,
        }
    }
}

async fn create_admin(db: &Database, args: CreateAdminArgs) -> Result<()> {
    let users = db.users();

    if let Some(existing) = users.find_by_email(&args.email).await? {
        // Already signed up; only make sure the role is admin.
        let updated = users
            .update_role(existing.id, Role::Admin)
            .await?
            .context("user disappeared while promoting")?;
        println!("Role set to admin for existing user: {}", updated.email);
        return Ok(());
    }

    if args.password.len() < 8 {
        bail!("password must be at least 8 characters");
    }

    let user = users.create(&args.email, &args.name, Role::Admin).await?;
    let hash = password::hash_password(&args.password)
        .context("failed to hash password")?;
    db.accounts().create_credential(user.id, &hash).await?;

    println!("Created admin user {} (id {})", user.email, user.id);
    Ok(())
}

async fn set_role(db: &Database, args: SetRoleArgs) -> Result<()> {
    let Some(role) = Role::parse(&args.role) else {
        bail!("unknown role '{}'; expected citizen, volunteer, or admin", args.role);
    };

    let updated = db.users().update_role_by_email(&args.email, role).await?;

    match updated {
        Some(user) => {
            println!("Role set to {} for: {}", user.role, user.email);
            Ok(())
        }
        None => bail!("no user found with email: {}", args.email),
    }
}

async fn list_users(db: &Database) -> Result<()> {
    let users = db.users().list_all().await?;

    if users.is_empty() {
        println!("No users.");
        return Ok(());
    }

    println!("{:<6} {:<30} {:<25} {:<10}", "ID", "EMAIL", "NAME", "ROLE");
    for user in users {
        println!(
            "{:<6} {:<30} {:<25} {:<10}",
            user.id.value(),
            user.email,
            user.name,
            user.role
        );
    }
    Ok(())
}

async fn db_check(db: &Database) -> Result<()> {
    db.health_check().await.context("database is not reachable")?;
    println!("Database connection OK");
    Ok(())
}
