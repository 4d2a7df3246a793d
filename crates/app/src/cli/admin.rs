use clap::{Args, Subcommand};
use storefront_app::{
    context::AppContext,
    domain::orders::{
        data::{OrderUpdate, order_code_from_params},
        filters::OrderFilter,
    },
};

use super::{CliError, ParamsArgs, render};

#[derive(Debug, Args)]
pub(crate) struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    /// Orders of every client
    #[command(subcommand)]
    Order(AdminOrderSubcommand),
}

#[derive(Debug, Subcommand)]
enum AdminOrderSubcommand {
    /// Show any order (`code`)
    Get(ParamsArgs),

    /// Filter orders (`client_email`, `min_order_date`, `max_order_date`,
    /// `order_payment_method`, `order_is_paid`, `order_status`,
    /// `order_is_fulfilled`, `max_orders_per_page`, `page_number`)
    List(ParamsArgs),

    /// Edit an order (`code`, `add_product_codes[i]`, `rem_product_codes[i]`,
    /// `charge_address`, `deliver_address`, `order_paid`, `status`)
    Update(ParamsArgs),

    /// Cancel any order (`code`)
    Cancel(ParamsArgs),
}

pub(crate) async fn run(command: AdminCommand, ctx: &AppContext) -> Result<String, CliError> {
    let AdminSubcommand::Order(command) = command.command;

    match command {
        AdminOrderSubcommand::Get(args) => {
            let code = order_code_from_params(&args.parse()?)?;

            render(&ctx.orders.admin_get_order(code).await?)
        }
        AdminOrderSubcommand::List(args) => {
            let filter = OrderFilter::from_params(&args.parse()?)?;

            render(&ctx.orders.admin_list_orders(&filter).await?)
        }
        AdminOrderSubcommand::Update(args) => {
            let params = args.parse()?;

            let code = order_code_from_params(&params)?;
            let update = OrderUpdate::from_params(&params)?;

            render(&ctx.orders.admin_update_order(code, update).await?)
        }
        AdminOrderSubcommand::Cancel(args) => {
            let code = order_code_from_params(&args.parse()?)?;

            render(&ctx.orders.admin_cancel_order(code).await?)
        }
    }
}
