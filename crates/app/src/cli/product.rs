use clap::{Args, Subcommand};
use jiff::Timestamp;
use rust_decimal::Decimal;
use storefront_app::{
    context::AppContext,
    domain::products::{
        data::{NewProduct, ProductUpdate},
        filters::ProductFilter,
        records::ProductCode,
    },
};

use super::{CliError, ParamsArgs, render};

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// Search enabled products (`name`, `min_price`, `max_price`, `brand`,
    /// `categories[i]`, `max_products_per_page`, `page_number`)
    Search(ParamsArgs),

    /// Newest enabled products
    Novelties(ParamsArgs),

    /// Discounted products, best discount first
    Promotions(ParamsArgs),

    /// Show a product by code
    Get {
        #[arg(long)]
        code: String,
    },

    /// Add a product under a generated code
    Create(CreateProductArgs),

    /// Change price, discount, stock or visibility
    Update(UpdateProductArgs),
}

#[derive(Debug, Args)]
struct CreateProductArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    brand: String,

    #[arg(long, default_value = "")]
    description: String,

    #[arg(long)]
    price: Decimal,

    /// Fraction between 0 and 1
    #[arg(long, default_value = "0")]
    discount: Decimal,

    #[arg(long, default_value_t = 0)]
    stock: u32,

    #[arg(long)]
    thumbnail_url: Option<String>,

    #[arg(long = "image-url")]
    image_urls: Vec<String>,

    #[arg(long = "category")]
    categories: Vec<String>,
}

#[derive(Debug, Args)]
struct UpdateProductArgs {
    #[arg(long)]
    code: String,

    #[arg(long)]
    price: Option<Decimal>,

    #[arg(long)]
    discount: Option<Decimal>,

    #[arg(long)]
    stock: Option<u32>,

    #[arg(long)]
    enabled: Option<bool>,
}

pub(crate) async fn run(command: ProductCommand, ctx: &AppContext) -> Result<String, CliError> {
    match command.command {
        ProductSubcommand::Search(args) => {
            let filter = ProductFilter::from_params(&args.parse()?)?;

            render(&ctx.products.search_products(&filter).await?)
        }
        ProductSubcommand::Novelties(args) => {
            let pagination = ProductFilter::pagination_from_params(&args.parse()?)?;

            render(&ctx.products.list_novelties(pagination).await?)
        }
        ProductSubcommand::Promotions(args) => {
            let pagination = ProductFilter::pagination_from_params(&args.parse()?)?;

            render(&ctx.products.list_promotions(pagination).await?)
        }
        ProductSubcommand::Get { code } => {
            render(&ctx.products.get_product(&ProductCode::new(code)).await?)
        }
        ProductSubcommand::Create(args) => {
            let product = NewProduct {
                name: args.name,
                brand: args.brand,
                description: args.description,
                price: args.price,
                discount: args.discount,
                stock: args.stock,
                thumbnail_url: args.thumbnail_url,
                image_urls: args.image_urls,
                categories: args.categories.into_iter().collect(),
                added_at: Timestamp::now(),
            };

            render(&ctx.products.create_product(product).await?)
        }
        ProductSubcommand::Update(args) => {
            let update = ProductUpdate {
                price: args.price,
                discount: args.discount,
                stock: args.stock,
                enabled: args.enabled,
            };

            render(
                &ctx.products
                    .update_product(&ProductCode::new(args.code), update)
                    .await?,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use storefront_app::domain::{
        orders::MockOrdersService,
        pagination::Page,
        products::{MockProductsService, ProductsServiceError},
    };
    use testresult::TestResult;

    use super::*;
    use crate::cli::fixtures;

    fn command(command: ProductSubcommand) -> ProductCommand {
        ProductCommand { command }
    }

    #[tokio::test]
    async fn search_forwards_parsed_filter() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_search_products()
            .withf(|filter: &ProductFilter| {
                filter.name.as_deref() == Some("lamp")
                    && filter.categories.as_slice() == ["Home".to_string(), "Office".to_string()]
                    && filter.pagination.page_size == 2
            })
            .times(1)
            .returning(|filter| {
                Ok(Page::from_rows(vec![fixtures::product("DL1")], filter.pagination))
            });

        let ctx = fixtures::context(products, MockOrdersService::new());

        let output = run(
            command(ProductSubcommand::Search(fixtures::params(&[
                "name=lamp",
                "categories[0]=Home",
                "categories[1]=Office",
                "max_products_per_page=2",
            ]))),
            &ctx,
        )
        .await?;

        let json: serde_json::Value = serde_json::from_str(&output)?;

        assert_eq!(json["items"][0]["code"], "DL1");
        assert_eq!(json["has_next_page"], false);

        Ok(())
    }

    #[tokio::test]
    async fn invalid_search_never_reaches_the_catalog() {
        let mut products = MockProductsService::new();

        products.expect_search_products().never();

        let ctx = fixtures::context(products, MockOrdersService::new());

        let result = run(
            command(ProductSubcommand::Search(fixtures::params(&[
                "min_price=300",
                "max_price=100",
            ]))),
            &ctx,
        )
        .await;

        assert!(matches!(
            result,
            Err(CliError::Params(ref error)) if error.field == "min_price"
        ));
    }

    #[tokio::test]
    async fn get_reports_missing_products() {
        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .with(eq(ProductCode::from("NOPE")))
            .times(1)
            .returning(|_| Err(ProductsServiceError::NotFound));

        let ctx = fixtures::context(products, MockOrdersService::new());

        let error = run(
            command(ProductSubcommand::Get {
                code: "NOPE".to_string(),
            }),
            &ctx,
        )
        .await
        .map_err(|error| error.status_code());

        assert_eq!(error, Err(404));
    }
}
