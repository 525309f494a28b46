//! Minibank CLI - banking operations from the command line
//!
//! Usage:
//! ```bash
//! minibank init
//! minibank register --name "Alice" --email alice@example.com --password secret123
//! minibank deposit checking 500 --email alice@example.com --password secret123
//! minibank transfer <ACCOUNT_ID> 200 --description "rent" --email ... --password ...
//! minibank pay-bill <BILL_ID> <ACCOUNT_ID> 7500 --email ... --password ...
//! minibank apply-loan home 120000 --tenure 60 --email ... --password ...
//! ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use minibank_ledger::ProcessorConfig;
use rust_decimal::Decimal;
use std::path::PathBuf;

mod commands;
mod db;

use commands::{account, loan, money};

/// Minibank - a demo retail-banking backend over SQLite
#[derive(Parser)]
#[command(name = "minibank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file path
    #[arg(long, default_value = "data/minibank.db", global = true)]
    pub db: PathBuf,

    /// Credit the destination account on transfers that name one
    #[arg(long, global = true)]
    pub credit_destination: bool,

    /// Allow mutations on frozen accounts
    #[arg(long, global = true)]
    pub allow_frozen: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Credentials passed with every authenticated command
#[derive(Args)]
pub struct AuthArgs {
    /// Account owner email
    #[arg(long)]
    pub email: String,
    /// Account owner password
    #[arg(long)]
    pub password: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database schema
    Init {
        /// Force re-initialization (drops existing data)
        #[arg(long)]
        force: bool,
    },

    /// Show database status
    Status,

    /// Register a new user (creates accounts, cards and starter bills)
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Verify credentials and print a session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// List your accounts
    Accounts {
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Show one account
    Account {
        /// Account ID
        account_id: String,
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Freeze an account
    Freeze {
        account_id: String,
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Unfreeze an account
    Unfreeze {
        account_id: String,
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Rename an account
    Rename {
        account_id: String,
        name: String,
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// List your cards
    Cards {
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Set a card's status (active or blocked)
    CardStatus {
        /// Card ID
        card_id: String,
        /// New status
        status: String,
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Show your profile
    Profile {
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Update your display name and phone
    UpdateProfile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Change your password
    ChangePassword {
        #[arg(long)]
        new_password: String,
        #[arg(long)]
        confirm_password: String,
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Deposit funds into your account of the given type
    Deposit {
        /// Account type (checking or savings; anything else means checking)
        account_type: String,
        /// Amount to deposit
        amount: Decimal,
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Transfer funds out of an account
    Transfer {
        /// Source account ID
        from_account_id: String,
        /// Amount to transfer
        amount: Decimal,
        /// Destination account ID (credited only with --credit-destination)
        #[arg(long)]
        to: Option<String>,
        /// Free-text description
        #[arg(long, default_value = "")]
        description: String,
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// List your bills
    Bills {
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Pay a bill from an account
    PayBill {
        /// Bill ID
        bill_id: String,
        /// Paying account ID
        account_id: String,
        /// Amount to pay
        amount: Decimal,
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Apply for a loan
    ApplyLoan {
        /// Loan type (home, personal, auto, education)
        loan_type: String,
        /// Principal amount
        principal: Decimal,
        /// Tenure in months
        #[arg(long)]
        tenure: Option<u32>,
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// List your loans
    Loans {
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// List your recent transactions
    Transactions {
        #[command(flatten)]
        auth: AuthArgs,
    },
}

impl Cli {
    fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            enforce_frozen: !self.allow_frozen,
            credit_destination: self.credit_destination,
            ..ProcessorConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // Ensure the data directory exists
    if let Some(parent) = cli.db.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let config = cli.processor_config();

    match &cli.command {
        Commands::Init { force } => {
            db::init_database(&cli.db, *force).await?;
            println!("✅ Database initialized at {:?}", cli.db);
        }

        Commands::Status => {
            db::show_status(&cli.db).await?;
        }

        Commands::Register {
            name,
            email,
            password,
        } => {
            account::register(&cli.db, name, email, password).await?;
        }

        Commands::Login { email, password } => {
            account::login(&cli.db, email, password).await?;
        }

        Commands::Accounts { auth } => {
            account::list(&cli.db, auth).await?;
        }

        Commands::Account { account_id, auth } => {
            account::show(&cli.db, auth, account_id).await?;
        }

        Commands::Freeze { account_id, auth } => {
            account::set_frozen(&cli.db, auth, account_id, true).await?;
        }

        Commands::Unfreeze { account_id, auth } => {
            account::set_frozen(&cli.db, auth, account_id, false).await?;
        }

        Commands::Rename {
            account_id,
            name,
            auth,
        } => {
            account::rename(&cli.db, auth, account_id, name).await?;
        }

        Commands::Cards { auth } => {
            account::cards(&cli.db, auth).await?;
        }

        Commands::CardStatus {
            card_id,
            status,
            auth,
        } => {
            account::set_card_status(&cli.db, auth, card_id, status).await?;
        }

        Commands::Profile { auth } => {
            account::profile(&cli.db, auth).await?;
        }

        Commands::UpdateProfile { name, phone, auth } => {
            account::update_profile(&cli.db, auth, name, phone.as_deref()).await?;
        }

        Commands::ChangePassword {
            new_password,
            confirm_password,
            auth,
        } => {
            account::change_password(&cli.db, auth, new_password, confirm_password).await?;
        }

        Commands::Deposit {
            account_type,
            amount,
            auth,
        } => {
            money::deposit(&cli.db, config, auth, account_type, *amount).await?;
        }

        Commands::Transfer {
            from_account_id,
            amount,
            to,
            description,
            auth,
        } => {
            money::transfer(
                &cli.db,
                config,
                auth,
                from_account_id,
                to.as_deref(),
                *amount,
                description,
            )
            .await?;
        }

        Commands::Bills { auth } => {
            money::bills(&cli.db, auth).await?;
        }

        Commands::PayBill {
            bill_id,
            account_id,
            amount,
            auth,
        } => {
            money::pay_bill(&cli.db, config, auth, bill_id, account_id, *amount).await?;
        }

        Commands::ApplyLoan {
            loan_type,
            principal,
            tenure,
            auth,
        } => {
            loan::apply(&cli.db, auth, loan_type, *principal, *tenure).await?;
        }

        Commands::Loans { auth } => {
            loan::list(&cli.db, auth).await?;
        }

        Commands::Transactions { auth } => {
            money::transactions(&cli.db, auth).await?;
        }
    }

    Ok(())
}
