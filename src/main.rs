//! Chowcart CLI

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chowcart::cart::NewCartItem;
use chowcart::checkout::CheckoutFlow;
use chowcart::config::ClientConfig;
use chowcart::context::AppContext;
use chowcart::orders::{Address, MarkPaidRequest, Order, OrderPoller, PaymentMethod, PaymentStatus};
use chowcart::prices::Price;

#[derive(Debug, Parser)]
#[command(name = "chowcart", about = "Food ordering client", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ClientConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage the stored session token
    Auth(AuthCommand),
    /// Inspect and mutate the local cart
    Cart(CartCommand),
    /// Submit the cart as an order
    Checkout(CheckoutArgs),
    /// Inspect and track orders
    Orders(OrdersCommand),
}

#[derive(Debug, Args)]
struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Debug, Subcommand)]
enum AuthSubcommand {
    /// Store a bearer token issued at sign-in
    SetToken {
        /// The raw bearer token
        token: String,
    },
    /// Remove the stored token
    ClearToken,
}

#[derive(Debug, Args)]
struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add a menu item to the cart
    Add(AddItemArgs),
    /// Remove a line from the cart
    Remove {
        /// Menu item id of the line to remove
        menu_item_id: String,
    },
    /// Set the quantity of an existing line (0 removes it)
    SetQuantity {
        /// Menu item id of the line
        menu_item_id: String,
        /// New quantity
        quantity: u32,
    },
    /// Print the cart and its total
    Show,
    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct AddItemArgs {
    /// Menu item id
    #[arg(long)]
    menu_item_id: String,

    /// Display title
    #[arg(long)]
    title: String,

    /// Unit price, plain or currency-formatted
    #[arg(long)]
    price: String,

    /// Restaurant the item belongs to
    #[arg(long)]
    restaurant_id: String,

    /// Thumbnail URL
    #[arg(long)]
    img: Option<String>,

    /// Note for this line
    #[arg(long)]
    notes: Option<String>,

    /// Quantity to add
    #[arg(long, default_value = "1")]
    quantity: u32,
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    /// Address line 1
    #[arg(long)]
    line1: String,

    /// Address line 2
    #[arg(long)]
    line2: Option<String>,

    /// City
    #[arg(long)]
    city: String,

    /// State or region
    #[arg(long)]
    state: Option<String>,

    /// Country
    #[arg(long, default_value = "Nigeria")]
    country: String,

    /// Postal code
    #[arg(long)]
    postal_code: Option<String>,

    /// Recipient name
    #[arg(long)]
    full_name: Option<String>,

    /// Contact phone number
    #[arg(long)]
    phone: String,
}

#[derive(Debug, Args)]
struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List my orders
    List,
    /// Fetch one order
    Get {
        /// Order id
        id: String,
    },
    /// Record a card payment against an order
    Pay {
        /// Order id
        id: String,
    },
    /// Poll an order until it reaches a terminal status
    Watch {
        /// Order id
        id: String,
    },
}

#[tokio::main]
pub async fn main() -> ExitCode {
    let _env = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), String> {
    let ctx = AppContext::from_config(&cli.config)
        .await
        .map_err(|error| format!("failed to start: {error}"))?;

    match cli.command {
        Commands::Auth(AuthCommand { command }) => auth(&ctx, command).await,
        Commands::Cart(CartCommand { command }) => cart(&ctx, command).await,
        Commands::Checkout(args) => checkout(&ctx, args).await,
        Commands::Orders(OrdersCommand { command }) => orders(&ctx, &cli.config, command).await,
    }
}

async fn auth(ctx: &AppContext, command: AuthSubcommand) -> Result<(), String> {
    match command {
        AuthSubcommand::SetToken { token } => {
            if token.trim().is_empty() {
                return Err("token cannot be empty".to_string());
            }

            ctx.tokens
                .save(&token)
                .await
                .map_err(|error| format!("failed to store token: {error}"))?;

            println!("token stored");
        }
        AuthSubcommand::ClearToken => {
            ctx.tokens
                .invalidate()
                .await
                .map_err(|error| format!("failed to clear token: {error}"))?;

            println!("token cleared");
        }
    }

    Ok(())
}

async fn cart(ctx: &AppContext, command: CartSubcommand) -> Result<(), String> {
    let mut cart = ctx.open_cart().await;

    match command {
        CartSubcommand::Add(args) => {
            let price = Price::parse(&args.price)
                .map_err(|error| format!("invalid price: {error}"))?;

            cart.add_item(
                NewCartItem {
                    menu_item_id: args.menu_item_id,
                    title: args.title,
                    price,
                    img: args.img,
                    notes: args.notes,
                    restaurant_id: Some(args.restaurant_id),
                },
                args.quantity,
            )
            .await
            .map_err(|error| error.to_string())?;

            println!("added; cart total: {}", cart.total());
        }
        CartSubcommand::Remove { menu_item_id } => {
            cart.remove_item(&menu_item_id).await;

            println!("removed; cart total: {}", cart.total());
        }
        CartSubcommand::SetQuantity {
            menu_item_id,
            quantity,
        } => {
            cart.update_quantity(&menu_item_id, quantity).await;

            println!("updated; cart total: {}", cart.total());
        }
        CartSubcommand::Show => {
            if cart.is_empty() {
                println!("cart is empty");
            } else {
                for item in cart.items() {
                    println!(
                        "{} × {} @ {} = {}",
                        item.quantity,
                        item.title,
                        item.price,
                        item.price.times(item.quantity)
                    );
                }

                println!("total: {}", cart.total());
            }
        }
        CartSubcommand::Clear => {
            cart.clear().await;

            println!("cart cleared");
        }
    }

    Ok(())
}

async fn checkout(ctx: &AppContext, args: CheckoutArgs) -> Result<(), String> {
    let mut cart = ctx.open_cart().await;
    let mut flow = CheckoutFlow::new(Arc::clone(&ctx.orders), ctx.tokens.clone());

    let address = Address {
        line1: args.line1,
        line2: args.line2,
        city: args.city,
        state: args.state,
        country: args.country,
        postal_code: args.postal_code,
        full_name: args.full_name,
        phone: Some(args.phone),
    };

    let order = flow
        .submit(&mut cart, &address)
        .await
        .map_err(|error| format!("checkout failed: {error}"))?;

    println!(
        "order placed: {}",
        order.order_ref().unwrap_or("(no reference returned)")
    );
    print_order(&order);

    Ok(())
}

async fn orders(
    ctx: &AppContext,
    config: &ClientConfig,
    command: OrdersSubcommand,
) -> Result<(), String> {
    match command {
        OrdersSubcommand::List => {
            let orders = ctx
                .orders
                .list_my_orders()
                .await
                .map_err(|error| format!("failed to list orders: {error}"))?;

            if orders.is_empty() {
                println!("no orders yet");
            }

            for order in orders {
                println!(
                    "{}  status: {}  payment: {}  total: {}",
                    order.order_ref().unwrap_or("?"),
                    order.status,
                    order.payment_status,
                    order.total_amount
                );
            }
        }
        OrdersSubcommand::Get { id } => {
            let order = ctx
                .orders
                .get_order(&id)
                .await
                .map_err(|error| format!("failed to fetch order: {error}"))?;

            print_order(&order);
        }
        OrdersSubcommand::Pay { id } => {
            let order = ctx
                .orders
                .get_order(&id)
                .await
                .map_err(|error| format!("failed to fetch order: {error}"))?;

            if order.payment_status.is_paid() {
                println!("order is already paid");
                return Ok(());
            }

            let request = MarkPaidRequest {
                payment_status: Some(PaymentStatus::Paid),
                payment_method: Some(PaymentMethod::Card),
            };

            let order = ctx
                .orders
                .mark_paid(&id, request)
                .await
                .map_err(|error| format!("payment failed: {error}"))?;

            println!("payment recorded");
            print_order(&order);
        }
        OrdersSubcommand::Watch { id } => watch(ctx, config, id).await?,
    }

    Ok(())
}

async fn watch(ctx: &AppContext, config: &ClientConfig, id: String) -> Result<(), String> {
    let handle = OrderPoller::start(Arc::clone(&ctx.orders), id, config.polling.interval());
    let mut updates = handle.updates();
    let mut paid_seen = false;

    println!("watching order (Ctrl-C to stop)");

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.map_err(|error| format!("failed to listen for Ctrl-C: {error}"))?;
                break;
            }
            changed = updates.changed() => {
                // The poller drops its sender once the order is terminal.
                if changed.is_err() {
                    println!("order reached a terminal status");
                    break;
                }

                let order = updates.borrow_and_update().clone();
                let Some(order) = order else { continue };

                println!("status: {}  payment: {}", order.status, order.payment_status);

                if order.payment_status.is_paid() && !paid_seen {
                    paid_seen = true;
                    println!("payment received");
                }
            }
        }
    }

    handle.stop().await;

    Ok(())
}

fn print_order(order: &Order) {
    if let Some(number) = order.order_number.as_deref() {
        println!("order {number}");
    }

    for item in &order.items {
        println!("  {} × {} @ {}", item.quantity, item.name, item.price);
    }

    println!("  status: {}", order.status);
    println!("  payment: {}", order.payment_status);
    println!("  total: {}", order.total_amount);
}
