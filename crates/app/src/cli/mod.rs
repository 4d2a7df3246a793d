use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use storefront_app::{
    context::AppContext,
    domain::identity::Identity,
    params::{Params, ValidationError},
};

use self::config::AppConfig;

mod admin;
mod client;
pub(crate) mod config;
mod error;
pub(crate) mod logging;
mod order;
mod product;

pub(crate) use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "storefront-app", about = "Storefront catalog and order CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Client accounts and addresses
    Client(client::ClientCommand),
    /// Catalog search and product maintenance
    Product(product::ProductCommand),
    /// Orders of the acting client
    Order(order::OrderCommand),
    /// Administrative operations
    Admin(admin::AdminCommand),
}

impl Cli {
    /// Runs the command and returns what should be printed on stdout.
    pub(crate) async fn run(self) -> Result<String, CliError> {
        let url = self
            .config
            .database
            .database_url
            .as_deref()
            .ok_or(CliError::MissingDatabaseUrl)?;

        let ctx =
            AppContext::from_database_url(url, self.config.database.database_max_connections).await?;

        let identity = Identity::from_optional_email(self.config.client_email);

        self.command.run(&ctx, &identity).await
    }
}

impl Commands {
    async fn run(self, ctx: &AppContext, identity: &Identity) -> Result<String, CliError> {
        match self {
            Self::Client(command) => client::run(command, ctx, identity).await,
            Self::Product(command) => product::run(command, ctx).await,
            Self::Order(command) => order::run(command, ctx, identity).await,
            Self::Admin(command) => admin::run(command, ctx).await,
        }
    }
}

/// Request parameters given as `key=value` pairs.
#[derive(Debug, Default, Args)]
pub(crate) struct ParamsArgs {
    /// Parameters such as `name=lamp` or `product_codes[0]=AB123`
    #[arg(value_name = "KEY=VALUE")]
    params: Vec<String>,
}

impl ParamsArgs {
    fn parse(&self) -> Result<Params, ValidationError> {
        Params::from_pairs(&self.params)
    }
}

fn render<T: Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}
