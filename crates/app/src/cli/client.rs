use clap::{Args, Subcommand};
use storefront_app::{
    context::AppContext,
    domain::{
        clients::{
            data::{AddressData, NewClient},
            records::{AddressKind, ClientUuid},
        },
        identity::Identity,
    },
};

use super::{CliError, render};

#[derive(Debug, Args)]
pub(crate) struct ClientCommand {
    #[command(subcommand)]
    command: ClientSubcommand,
}

#[derive(Debug, Subcommand)]
enum ClientSubcommand {
    /// Register a client
    Create(CreateClientArgs),

    /// Show the acting client with its addresses
    Show,

    /// Store the acting client's charge or deliver address
    Address(AddressArgs),
}

#[derive(Debug, Args)]
struct CreateClientArgs {
    #[arg(long)]
    email: String,

    #[arg(long)]
    name: String,
}

#[derive(Debug, Args)]
struct AddressArgs {
    /// `charge` or `deliver`
    #[arg(long)]
    kind: AddressKind,

    #[arg(long)]
    recipient: String,

    #[arg(long)]
    street: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    province: String,

    #[arg(long)]
    postal_code: String,

    #[arg(long)]
    country: String,

    #[arg(long)]
    phone: Option<String>,
}

impl From<AddressArgs> for AddressData {
    fn from(args: AddressArgs) -> Self {
        Self {
            recipient: args.recipient,
            street: args.street,
            city: args.city,
            province: args.province,
            postal_code: args.postal_code,
            country: args.country,
            phone: args.phone,
        }
    }
}

pub(crate) async fn run(
    command: ClientCommand,
    ctx: &AppContext,
    identity: &Identity,
) -> Result<String, CliError> {
    match command.command {
        ClientSubcommand::Create(args) => {
            let client = ctx
                .clients
                .create_client(NewClient {
                    uuid: ClientUuid::new(),
                    email: args.email,
                    name: args.name,
                })
                .await?;

            render(&client)
        }
        ClientSubcommand::Show => render(&ctx.clients.get_client(identity).await?),
        ClientSubcommand::Address(args) => {
            let kind = args.kind;
            let address = ctx.clients.put_address(identity, kind, args.into()).await?;

            render(&address)
        }
    }
}
