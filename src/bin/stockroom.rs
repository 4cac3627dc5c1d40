//! stockroom: inventory administration from the command line
//!
//! Every command except `login` needs a persisted session. Commands go
//! through the same route guard as the dashboard, so an expired session
//! ends the command with a prompt to sign in again.
//!
//! ## Configuration
//! - `--config` or STOCKROOM_CONFIG: YAML configuration file
//! - STOCKROOM__API__BASE_URL: backend base URL
//! - STOCKROOM_LOG: log filter (e.g. `stockroom=debug`)

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;

use stockroom::config::Config;
use stockroom::console::{Catalog, Console};
use stockroom::routes::{DASHBOARD_ROUTE, LOGIN_ROUTE};
use stockroom::{App, Error, Result};
use stockroom_client::model::{
    CustomerAction, Id, ImageOptions, ImageVariant, ListParams, LoginRequest, OrderFilter,
    StockAdjustment, StockCount,
};
use stockroom_client::services::CatalogResource;
use stockroom_client::{ClientError, OrderStatus};

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(about = "Inventory administration console")]
struct Cli {
    /// Configuration file.
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and persist the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "STOCKROOM_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    Orders {
        #[command(subcommand)]
        command: OrdersCommand,
    },
    Products {
        #[command(subcommand)]
        command: ProductsCommand,
    },
    Stock {
        #[command(subcommand)]
        command: StockCommand,
    },
    Categories {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    Brands {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    Attributes {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    Customers {
        #[command(subcommand)]
        command: CustomersCommand,
    },
    Images {
        #[command(subcommand)]
        command: ImagesCommand,
    },
}

#[derive(Args, Clone)]
struct ListArgs {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    sort: Option<String>,
}

impl From<ListArgs> for ListParams {
    fn from(args: ListArgs) -> Self {
        ListParams {
            page: args.page,
            limit: args.limit,
            search: args.search,
            sort: args.sort,
        }
    }
}

#[derive(Args, Clone)]
struct OrderFilterArgs {
    #[command(flatten)]
    list: ListArgs,
    #[arg(long)]
    status: Option<OrderStatus>,
    #[arg(long)]
    assigned_to: Option<Id>,
}

impl From<OrderFilterArgs> for OrderFilter {
    fn from(args: OrderFilterArgs) -> Self {
        OrderFilter {
            list: args.list.into(),
            status: args.status,
            assigned_to: args.assigned_to,
            ..Default::default()
        }
    }
}

#[derive(Subcommand)]
enum OrdersCommand {
    List(OrderFilterArgs),
    Show { id: Id },
    /// Orders grouped by status column.
    Board(ListArgs),
    /// Statuses the order can move to.
    Transitions { id: Id },
    Status { id: Id, status: OrderStatus },
    /// Move the order along its primary edge.
    Advance { id: Id },
    Assign { id: Id, user_id: Id },
    Notes { id: Id },
    Note { id: Id, body: String },
    DeleteNote { id: Id, note_id: Id },
    Delete { id: Id },
    BulkPrint {
        #[arg(required = true)]
        ids: Vec<Id>,
    },
    Export {
        path: PathBuf,
        #[command(flatten)]
        filter: OrderFilterArgs,
    },
}

#[derive(Subcommand)]
enum ProductsCommand {
    List(ListArgs),
    Show { id: Id },
    /// Create from a JSON body.
    Create { json: String },
    Update { id: Id, json: String },
    Delete { id: Id },
    Variants { id: Id },
    AddVariant { id: Id, json: String },
    UpdateVariant { variant_id: Id, json: String },
    DeleteVariant { variant_id: Id },
    Export {
        path: PathBuf,
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand)]
enum StockCommand {
    /// Receive (positive) or remove (negative) units.
    Adjust {
        variant_id: Id,
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
        #[arg(long)]
        reason: String,
    },
    /// Record a physical count.
    Count {
        variant_id: Id,
        counted: i64,
        #[arg(long)]
        note: Option<String>,
    },
}

#[derive(Subcommand)]
enum CatalogCommand {
    List(ListArgs),
    Show { id: Id },
    Create { json: String },
    Update { id: Id, json: String },
    Delete { id: Id },
}

#[derive(Subcommand)]
enum CustomersCommand {
    List(ListArgs),
    Show { id: Id },
    Activate { id: Id },
    Deactivate { id: Id },
    Block { id: Id },
}

#[derive(Subcommand)]
enum ImagesCommand {
    Upload {
        path: PathBuf,
        #[arg(long, default_value = "original")]
        variant: ImageVariant,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(long)]
        quality: Option<u8>,
    },
    Delete {
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    stockroom::utils::bootstrap::init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Command failed");
            eprintln!("error: {}", err.message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let app = App::new(config)?;
    app.start();

    let mut notifications = app.notifier().subscribe();
    let outcome = dispatch(&app, cli.command).await;
    while let Ok(note) = notifications.try_recv() {
        eprintln!("[{}] {}", note.level, note.message);
    }
    outcome
}

async fn dispatch(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            app.navigator().navigate(LOGIN_ROUTE).await;
            let user = app
                .auth()
                .login(&LoginRequest::new(email, password))
                .await?;
            println!("Signed in as {} <{}>", user.display_name(), user.email);
            Ok(())
        }
        Command::Logout => {
            app.auth().logout().await;
            Ok(())
        }
        Command::Whoami => {
            enter(app, DASHBOARD_ROUTE).await?;
            match app.auth().current_user() {
                Some(user) => print_json(&user),
                None => Err(ClientError::Unauthorized.into()),
            }
        }
        Command::Orders { command } => {
            enter(app, "/orders").await?;
            orders(app.console(), command).await
        }
        Command::Products { command } => {
            enter(app, "/products").await?;
            products(app.console(), command).await
        }
        Command::Stock { command } => {
            enter(app, "/products").await?;
            stock(app.console(), command).await
        }
        Command::Categories { command } => {
            enter(app, "/categories").await?;
            catalog(app.console().categories(), command).await
        }
        Command::Brands { command } => {
            enter(app, "/brands").await?;
            catalog(app.console().brands(), command).await
        }
        Command::Attributes { command } => {
            enter(app, "/attributes").await?;
            catalog(app.console().attributes(), command).await
        }
        Command::Customers { command } => {
            enter(app, "/customers").await?;
            customers(app.console(), command).await
        }
        Command::Images { command } => {
            enter(app, "/products").await?;
            images(app.console(), command).await
        }
    }
}

/// Navigate to `route`; being sent to the sign-in page ends the command.
async fn enter(app: &App, route: &str) -> Result<()> {
    if app.navigator().navigate(route).await == LOGIN_ROUTE {
        return Err(ClientError::Unauthorized.into());
    }
    Ok(())
}

async fn orders(console: &Console, command: OrdersCommand) -> Result<()> {
    match command {
        OrdersCommand::List(filter) => print_json(&console.orders(&filter.into()).await?),
        OrdersCommand::Show { id } => print_json(&console.order(id).await?),
        OrdersCommand::Board(list) => {
            for column in console.order_board(&list.into()).await? {
                println!("{} ({})", column.status.label(), column.orders.len());
                for order in &column.orders {
                    println!("  {}", order.reference());
                }
            }
            Ok(())
        }
        OrdersCommand::Transitions { id } => {
            for status in console.order_transitions(id).await? {
                println!("{}\t{}", status, status.label());
            }
            Ok(())
        }
        OrdersCommand::Status { id, status } => {
            print_json(&console.update_order_status(id, status).await?)
        }
        OrdersCommand::Advance { id } => print_json(&console.advance_order(id).await?),
        OrdersCommand::Assign { id, user_id } => {
            print_json(&console.assign_order(id, user_id).await?)
        }
        OrdersCommand::Notes { id } => print_json(&console.order_notes(id).await?),
        OrdersCommand::Note { id, body } => print_json(&console.add_order_note(id, &body).await?),
        OrdersCommand::DeleteNote { id, note_id } => console.delete_order_note(id, note_id).await,
        OrdersCommand::Delete { id } => console.delete_order(id).await,
        OrdersCommand::BulkPrint { ids } => print_json(&console.bulk_print(&ids).await?),
        OrdersCommand::Export { path, filter } => {
            let written = console.export_orders(&filter.into(), &path).await?;
            println!("{written} bytes written to {}", path.display());
            Ok(())
        }
    }
}

async fn products(console: &Console, command: ProductsCommand) -> Result<()> {
    match command {
        ProductsCommand::List(list) => print_json(&console.products(&list.into()).await?),
        ProductsCommand::Show { id } => print_json(&console.product(id).await?),
        ProductsCommand::Create { json } => {
            print_json(&console.create_product(&parse_body(&json)?).await?)
        }
        ProductsCommand::Update { id, json } => {
            print_json(&console.update_product(id, &parse_body(&json)?).await?)
        }
        ProductsCommand::Delete { id } => console.delete_product(id).await,
        ProductsCommand::Variants { id } => print_json(&console.product_variants(id).await?),
        ProductsCommand::AddVariant { id, json } => {
            print_json(&console.create_variant(id, &parse_body(&json)?).await?)
        }
        ProductsCommand::UpdateVariant { variant_id, json } => {
            print_json(&console.update_variant(variant_id, &parse_body(&json)?).await?)
        }
        ProductsCommand::DeleteVariant { variant_id } => console.delete_variant(variant_id).await,
        ProductsCommand::Export { path, list } => {
            let written = console.export_products(&list.into(), &path).await?;
            println!("{written} bytes written to {}", path.display());
            Ok(())
        }
    }
}

async fn stock(console: &Console, command: StockCommand) -> Result<()> {
    let variant = match command {
        StockCommand::Adjust {
            variant_id,
            quantity,
            reason,
        } => {
            console
                .adjust_stock(variant_id, &StockAdjustment { quantity, reason })
                .await?
        }
        StockCommand::Count {
            variant_id,
            counted,
            note,
        } => {
            console
                .count_stock(variant_id, &StockCount { counted, note })
                .await?
        }
    };
    print_json(&variant)
}

async fn catalog<R>(catalog: Catalog<'_, R>, command: CatalogCommand) -> Result<()>
where
    R: CatalogResource + Clone + Sync + Serialize,
    R::Input: DeserializeOwned,
{
    match command {
        CatalogCommand::List(list) => print_json(&catalog.list(&list.into()).await?),
        CatalogCommand::Show { id } => print_json(&catalog.get(id).await?),
        CatalogCommand::Create { json } => {
            print_json(&catalog.create(&parse_body(&json)?).await?)
        }
        CatalogCommand::Update { id, json } => {
            print_json(&catalog.update(id, &parse_body(&json)?).await?)
        }
        CatalogCommand::Delete { id } => catalog.delete(id).await,
    }
}

async fn customers(console: &Console, command: CustomersCommand) -> Result<()> {
    let (id, action) = match command {
        CustomersCommand::List(list) => return print_json(&console.customers(&list.into()).await?),
        CustomersCommand::Show { id } => return print_json(&console.customer(id).await?),
        CustomersCommand::Activate { id } => (id, CustomerAction::Activate),
        CustomersCommand::Deactivate { id } => (id, CustomerAction::Deactivate),
        CustomersCommand::Block { id } => (id, CustomerAction::Block),
    };
    print_json(&console.change_customer_status(id, action).await?)
}

async fn images(console: &Console, command: ImagesCommand) -> Result<()> {
    match command {
        ImagesCommand::Upload {
            path,
            variant,
            width,
            height,
            quality,
        } => {
            let options = ImageOptions {
                width,
                height,
                quality,
            };
            print_json(&console.upload_image(&path, variant, &options).await?)
        }
        ImagesCommand::Delete { keys } => match keys.as_slice() {
            [key] => console.delete_image(key).await,
            _ => console.delete_images(&keys).await,
        },
    }
}

fn parse_body<T: DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json)
        .map_err(|e| Error::Client(ClientError::InvalidArgument(format!("invalid JSON body: {e}"))))
}

fn render_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Error::Render)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", render_json(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_render_json_is_pretty() {
        let out = render_json(&serde_json::json!({"id": 7})).unwrap();
        assert_eq!(out, "{\n  \"id\": 7\n}");
    }

    #[test]
    fn test_unrenderable_output_is_not_a_session_error() {
        // JSON object keys must be strings.
        let value: HashMap<(i32, i32), i32> = HashMap::from([((1, 2), 3)]);

        let err = render_json(&value).unwrap_err();

        assert!(matches!(err, Error::Render(_)));
        assert!(err.message().starts_with("cannot render output"));
        assert!(!err.message().contains("session"));
    }

    #[test]
    fn test_invalid_body_is_invalid_argument() {
        let err = parse_body::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(err, Error::Client(ClientError::InvalidArgument(_))));
    }
}
