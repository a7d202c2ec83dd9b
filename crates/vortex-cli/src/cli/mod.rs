//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use vortex_core::config::Config;

mod commands;

#[derive(Parser)]
#[command(name = "vortex")]
#[command(version)]
#[command(about = "Inventory management client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in with email/username and password
    Login {
        /// Email or username
        #[arg(value_name = "IDENTIFIER")]
        identifier: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Ask for a longer-lived refresh token
        #[arg(long)]
        remember: bool,
    },

    /// Create an account and sign in
    Register {
        #[arg(value_name = "EMAIL")]
        email: String,

        #[arg(value_name = "USERNAME")]
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },

    /// Sign out (invalidates the refresh token server-side)
    Logout,

    /// Show the current session
    Status,

    /// Request a password-recovery email
    ForgotPassword {
        #[arg(value_name = "EMAIL")]
        email: String,
    },

    /// Complete a password reset with a recovery token
    ResetPassword {
        #[arg(value_name = "TOKEN")]
        token: String,

        /// New password
        #[arg(short, long)]
        password: String,
    },

    /// Move a session between applications
    Handoff {
        #[command(subcommand)]
        command: HandoffCommands,
    },

    /// Manage product types
    ProductTypes {
        #[command(subcommand)]
        command: ProductTypeCommands,
    },

    /// Manage products
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },

    /// Manage stock movements
    Movements {
        #[command(subcommand)]
        command: MovementCommands,
    },

    /// Inventory reports
    Reports {
        #[command(subcommand)]
        command: ReportCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum HandoffCommands {
    /// Print a URL that carries the current session to another application
    Export {
        /// Destination URL
        #[arg(value_name = "URL")]
        target: String,
    },
    /// Absorb a session from a handoff URL
    Import {
        /// URL received from the sign-in application
        #[arg(value_name = "URL")]
        url: String,
    },
}

#[derive(clap::Subcommand)]
enum ProductTypeCommands {
    /// List product types
    List,
    /// Show a product type
    Show {
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Create a product type
    Create {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Rename a product type
    Update {
        #[arg(value_name = "ID")]
        id: i64,
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Delete a product type
    Delete {
        #[arg(value_name = "ID")]
        id: i64,
    },
}

#[derive(clap::Subcommand)]
enum ProductCommands {
    /// List products
    List,
    /// Show a product
    Show {
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Create a product
    Create {
        #[arg(value_name = "DESCRIPTION")]
        description: String,

        /// Unit cost paid to the supplier
        #[arg(long, value_name = "VALUE")]
        supplier_value: f64,

        /// Initial stock quantity
        #[arg(long, default_value_t = 0)]
        quantity: i64,

        /// Product type ID
        #[arg(long = "type", value_name = "TYPE_ID")]
        product_type_id: i64,
    },
    /// Update a product
    Update {
        #[arg(value_name = "ID")]
        id: i64,

        #[arg(value_name = "DESCRIPTION")]
        description: String,

        #[arg(long, value_name = "VALUE")]
        supplier_value: f64,

        #[arg(long)]
        quantity: i64,

        #[arg(long = "type", value_name = "TYPE_ID")]
        product_type_id: i64,
    },
    /// Delete a product
    Delete {
        #[arg(value_name = "ID")]
        id: i64,
    },
}

#[derive(clap::Subcommand)]
enum MovementCommands {
    /// List stock movements
    List,
    /// Show a movement
    Show {
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Register a stock entry
    Entry {
        /// Product ID
        #[arg(value_name = "PRODUCT_ID")]
        product_id: i64,

        #[arg(value_name = "QUANTITY")]
        quantity: i64,
    },
    /// Register a stock exit (sale value is computed server-side)
    Exit {
        /// Product ID
        #[arg(value_name = "PRODUCT_ID")]
        product_id: i64,

        #[arg(value_name = "QUANTITY")]
        quantity: i64,
    },
    /// Update a movement
    Update {
        #[arg(value_name = "ID")]
        id: i64,

        /// Movement kind (entry or exit)
        #[arg(long, value_name = "KIND")]
        kind: String,

        /// Product ID
        #[arg(long = "product", value_name = "PRODUCT_ID")]
        product_id: i64,

        #[arg(long)]
        quantity: i64,
    },
    /// Delete a movement
    Delete {
        #[arg(value_name = "ID")]
        id: i64,
    },
}

#[derive(clap::Subcommand)]
enum ReportCommands {
    /// Products of a type, with stock and exit totals
    ProductsByType {
        /// Product type ID
        #[arg(value_name = "TYPE_ID")]
        product_type_id: i64,
    },
    /// Profit per product
    ProfitByProduct,
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Show or change the UI theme
    Theme {
        /// New theme (light or dark); omit to toggle
        #[arg(value_name = "MODE")]
        mode: Option<String>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("VORTEX_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;

    match cli.command {
        Commands::Login {
            identifier,
            password,
            remember,
        } => commands::auth::login(&config, identifier, password, remember).await,
        Commands::Register {
            email,
            username,
            password,
        } => commands::auth::register(&config, email, username, password).await,
        Commands::Logout => commands::auth::logout(&config).await,
        Commands::Status => commands::auth::status(&config).await,
        Commands::ForgotPassword { email } => {
            commands::auth::forgot_password(&config, email).await
        }
        Commands::ResetPassword { token, password } => {
            commands::auth::reset_password(&config, token, password).await
        }

        Commands::Handoff { command } => match command {
            HandoffCommands::Export { target } => commands::handoff::export(&config, &target),
            HandoffCommands::Import { url } => commands::handoff::import(&config, &url),
        },

        Commands::ProductTypes { command } => match command {
            ProductTypeCommands::List => commands::product_types::list(&config).await,
            ProductTypeCommands::Show { id } => commands::product_types::show(&config, id).await,
            ProductTypeCommands::Create { name } => {
                commands::product_types::create(&config, name).await
            }
            ProductTypeCommands::Update { id, name } => {
                commands::product_types::update(&config, id, name).await
            }
            ProductTypeCommands::Delete { id } => {
                commands::product_types::delete(&config, id).await
            }
        },

        Commands::Products { command } => match command {
            ProductCommands::List => commands::products::list(&config).await,
            ProductCommands::Show { id } => commands::products::show(&config, id).await,
            ProductCommands::Create {
                description,
                supplier_value,
                quantity,
                product_type_id,
            } => {
                commands::products::create(
                    &config,
                    description,
                    supplier_value,
                    quantity,
                    product_type_id,
                )
                .await
            }
            ProductCommands::Update {
                id,
                description,
                supplier_value,
                quantity,
                product_type_id,
            } => {
                commands::products::update(
                    &config,
                    id,
                    description,
                    supplier_value,
                    quantity,
                    product_type_id,
                )
                .await
            }
            ProductCommands::Delete { id } => commands::products::delete(&config, id).await,
        },

        Commands::Movements { command } => match command {
            MovementCommands::List => commands::movements::list(&config).await,
            MovementCommands::Show { id } => commands::movements::show(&config, id).await,
            MovementCommands::Entry {
                product_id,
                quantity,
            } => commands::movements::entry(&config, product_id, quantity).await,
            MovementCommands::Exit {
                product_id,
                quantity,
            } => commands::movements::exit(&config, product_id, quantity).await,
            MovementCommands::Update {
                id,
                kind,
                product_id,
                quantity,
            } => commands::movements::update(&config, id, &kind, product_id, quantity).await,
            MovementCommands::Delete { id } => commands::movements::delete(&config, id).await,
        },

        Commands::Reports { command } => match command {
            ReportCommands::ProductsByType { product_type_id } => {
                commands::reports::products_by_type(&config, product_type_id).await
            }
            ReportCommands::ProfitByProduct => commands::reports::profit_by_product(&config).await,
        },

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Theme { mode } => commands::config::theme(&config, mode.as_deref()),
        },
    }
}
