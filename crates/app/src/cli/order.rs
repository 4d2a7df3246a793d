use clap::{Args, Subcommand};
use jiff::Timestamp;
use storefront_app::{
    context::AppContext,
    domain::{
        identity::Identity,
        orders::{
            data::{NewOrder, order_code_from_params},
            filters::OrderFilter,
        },
    },
};

use super::{CliError, ParamsArgs, render};

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// Place an order (`product_codes[i]`, `payment_method`)
    Create(ParamsArgs),

    /// Show one of the acting client's open orders (`code`)
    Get(ParamsArgs),

    /// List the acting client's open orders (`max_orders_per_page`, `page_number`)
    List(ParamsArgs),

    /// Cancel an unpaid order (`code`)
    Cancel(ParamsArgs),
}

pub(crate) async fn run(
    command: OrderCommand,
    ctx: &AppContext,
    identity: &Identity,
) -> Result<String, CliError> {
    match command.command {
        OrderSubcommand::Create(args) => {
            let order = NewOrder::from_params(&args.parse()?, Timestamp::now())?;

            render(&ctx.orders.create_order(identity, order).await?)
        }
        OrderSubcommand::Get(args) => {
            let code = order_code_from_params(&args.parse()?)?;

            render(&ctx.orders.get_order(identity, code).await?)
        }
        OrderSubcommand::List(args) => {
            let pagination = OrderFilter::pagination_from_params(&args.parse()?)?;

            render(&ctx.orders.list_orders(identity, pagination).await?)
        }
        OrderSubcommand::Cancel(args) => {
            let code = order_code_from_params(&args.parse()?)?;

            render(&ctx.orders.cancel_order(identity, code).await?)
        }
    }
}
