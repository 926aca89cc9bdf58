use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use inventory_admin::{
    client::FilterQuery,
    config,
    errors::ServiceError,
    forms::{normalize_date, InventoryForm},
    models::{InventoryItem, InventoryRow, UnitOfMeasurement},
    notifications::InMemoryNotificationService,
    presentation::{ListView, SortDirection, SortKey},
    validation::Field,
    AppState,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = CliContext::initialize().await?;

    let result = match cli.command {
        Commands::List(args) => handle_list(&context, args, cli.json).await,
        Commands::Get(args) => handle_get(&context, args, cli.json).await,
        Commands::Filter(args) => handle_filter(&context, args, cli.json).await,
        Commands::Create(args) => handle_create(&context, args, cli.json).await,
        Commands::Edit(args) => handle_edit(&context, args, cli.json).await,
        Commands::Delete(args) => handle_delete(&context, args, cli.json).await,
        Commands::Products => handle_products(&context, cli.json).await,
    };

    context.flush_notifications(cli.json).await;
    result
}

#[derive(Parser)]
#[command(name = "inventory", about = "Inventory administration from the command line", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List cached inventory, sorted locally or by the service
    List(ListArgs),
    /// Fetch a single record by id
    Get(GetArgs),
    /// Query the service with optional criteria
    Filter(FilterArgs),
    /// Create a record through the form validation rules
    Create(ItemFieldArgs),
    /// Edit a saved record through the form validation rules
    Edit(EditArgs),
    /// Delete one or more records
    Delete(DeleteArgs),
    /// List known product types
    Products,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortKeyArg {
    Name,
    ProductType,
    Description,
    Amount,
    AveragePrice,
    UnitOfMeasurement,
    BestBeforeDate,
}

impl From<SortKeyArg> for SortKey {
    fn from(value: SortKeyArg) -> Self {
        match value {
            SortKeyArg::Name => SortKey::Name,
            SortKeyArg::ProductType => SortKey::ProductType,
            SortKeyArg::Description => SortKey::Description,
            SortKeyArg::Amount => SortKey::Amount,
            SortKeyArg::AveragePrice => SortKey::AveragePrice,
            SortKeyArg::UnitOfMeasurement => SortKey::UnitOfMeasurement,
            SortKeyArg::BestBeforeDate => SortKey::BestBeforeDate,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortDirectionArg {
    Asc,
    Desc,
}

impl From<SortDirectionArg> for SortDirection {
    fn from(value: SortDirectionArg) -> Self {
        match value {
            SortDirectionArg::Asc => SortDirection::Asc,
            SortDirectionArg::Desc => SortDirection::Desc,
        }
    }
}

#[derive(Args)]
struct ListArgs {
    #[arg(long, value_enum, default_value = "name", help = "Column to sort by")]
    sort: SortKeyArg,
    #[arg(long, value_enum, default_value = "asc", help = "Sort direction")]
    direction: SortDirectionArg,
    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "Ask the service to sort instead of sorting locally"
    )]
    remote: bool,
}

#[derive(Args)]
struct GetArgs {
    #[arg(long, help = "Inventory identifier")]
    id: String,
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long, value_parser = parse_unit, help = "Unit code or abbreviation (e.g. POUND or lb)")]
    unit: Option<UnitOfMeasurement>,
    #[arg(long, value_parser = parse_decimal, help = "Exact amount")]
    amount: Option<Decimal>,
    #[arg(long, help = "Best-before date (YYYY-MM-DD)")]
    best_before: Option<String>,
}

#[derive(Args)]
struct ItemFieldArgs {
    #[arg(long, help = "Display name")]
    name: Option<String>,
    #[arg(long, help = "Product type; must be a known product")]
    product_type: Option<String>,
    #[arg(long, help = "Free-form description")]
    description: Option<String>,
    #[arg(long, help = "Average price")]
    average_price: Option<String>,
    #[arg(long, help = "Amount in stock")]
    amount: Option<String>,
    #[arg(long, help = "Unit code or abbreviation (e.g. POUND or lb)")]
    unit: Option<String>,
    #[arg(long, help = "Best-before date (YYYY-MM-DD)")]
    best_before: Option<String>,
    #[arg(long, help = "Whether the item never expires (true/false)")]
    never_expires: Option<bool>,
}

impl ItemFieldArgs {
    fn apply(self, form: &mut InventoryForm) {
        let unit = self.unit.map(|raw| {
            UnitOfMeasurement::parse_loose(&raw)
                .map(|unit| unit.code().to_string())
                .unwrap_or(raw)
        });
        let updates = [
            (Field::Name, self.name),
            (Field::ProductType, self.product_type),
            (Field::Description, self.description),
            (Field::AveragePrice, self.average_price),
            (Field::Amount, self.amount),
            (Field::UnitOfMeasurement, unit),
            (Field::BestBeforeDate, self.best_before),
            (Field::NeverExpires, self.never_expires.map(|flag| flag.to_string())),
        ];
        for (field, value) in updates {
            if let Some(value) = value {
                form.set_field(field, value);
            }
        }
    }
}

#[derive(Args)]
struct EditArgs {
    #[arg(long, help = "Inventory identifier")]
    id: String,
    #[command(flatten)]
    fields: ItemFieldArgs,
}

#[derive(Args)]
struct DeleteArgs {
    #[arg(
        long = "id",
        required = true,
        action = ArgAction::Append,
        help = "Inventory identifier; repeat to delete several"
    )]
    ids: Vec<String>,
}

struct CliContext {
    state: AppState,
    notifications: InMemoryNotificationService,
}

impl CliContext {
    async fn initialize() -> Result<Self> {
        let config = config::load_config().context("failed to load application config")?;
        config::init_tracing(config.log_level(), config.log_json);

        let notifications = InMemoryNotificationService::new();
        let state = AppState::from_config(config, Arc::new(notifications.clone()))
            .context("failed to build inventory client")?;
        debug!("Using inventory service at {}", state.config.api_base_url);

        Ok(Self {
            state,
            notifications,
        })
    }

    async fn load(&self) -> Result<()> {
        self.state
            .inventory_service
            .load()
            .await
            .context("failed to load inventory")
    }

    async fn flush_notifications(&self, json: bool) {
        for notification in self.notifications.all().await {
            if json {
                eprintln!("{}", notification.message);
            } else {
                println!("{}", notification.message);
            }
        }
    }
}

async fn handle_list(context: &CliContext, args: ListArgs, json: bool) -> Result<()> {
    let key = SortKey::from(args.sort);
    let direction = SortDirection::from(args.direction);
    let service = &context.state.inventory_service;

    let rows: Vec<InventoryRow> = if args.remote {
        let items = service
            .refresh_sorted(key, direction)
            .await
            .context("failed to load sorted inventory")?;
        items.iter().map(InventoryItem::normalize).collect()
    } else {
        context.load().await?;
        let mut view = ListView::new(key, direction);
        view.render(&service.snapshot().await)
    };

    if json {
        print_json(&rows)?;
    } else if rows.is_empty() {
        println!("No inventory found");
    } else {
        rows.iter().for_each(render_row);
    }
    Ok(())
}

async fn handle_get(context: &CliContext, args: GetArgs, json: bool) -> Result<()> {
    let item = context
        .state
        .inventory_service
        .retrieve(&args.id)
        .await
        .context("failed to retrieve inventory")?
        .ok_or_else(|| anyhow!("inventory {} not found", args.id))?;

    if json {
        print_json(&item)?;
    } else {
        render_row(&item.normalize());
    }
    Ok(())
}

async fn handle_filter(context: &CliContext, args: FilterArgs, json: bool) -> Result<()> {
    let best_before_date = match args.best_before.as_deref() {
        Some(raw) => Some(
            normalize_date(raw)
                .ok_or_else(|| anyhow!("invalid date '{}', expected YYYY-MM-DD", raw))?,
        ),
        None => None,
    };
    let query = FilterQuery {
        unit_of_measurement: args.unit,
        amount: args.amount,
        best_before_date,
    };

    let items = context
        .state
        .inventory_service
        .filter(&query)
        .await
        .context("failed to filter inventory")?;

    if json {
        print_json(&items)?;
    } else {
        items.iter().map(InventoryItem::normalize).for_each(|row| render_row(&row));
    }
    Ok(())
}

async fn handle_create(context: &CliContext, args: ItemFieldArgs, json: bool) -> Result<()> {
    context.load().await?;
    let mut form = context.state.create_form().await;
    args.apply(&mut form);
    submit_form(context, form, json).await
}

async fn handle_edit(context: &CliContext, args: EditArgs, json: bool) -> Result<()> {
    context.load().await?;
    let item = context
        .state
        .inventory_service
        .snapshot()
        .await
        .into_iter()
        .find(|item| item.saved_id() == Some(args.id.as_str()))
        .ok_or_else(|| anyhow!("inventory {} not found", args.id))?;

    let mut form = context.state.edit_form(&item).await;
    args.fields.apply(&mut form);
    submit_form(context, form, json).await
}

async fn submit_form(context: &CliContext, mut form: InventoryForm, json: bool) -> Result<()> {
    if !form.is_dirty() {
        form.cancel();
        bail!("nothing to save: no field was changed");
    }

    match form.submit(&context.state.inventory_service).await {
        Ok(saved) => {
            if json {
                print_json(&saved)?;
            } else {
                render_row(&saved.normalize());
            }
            Ok(())
        }
        Err(ServiceError::ValidationError(_)) => {
            for (field, message) in form.errors() {
                eprintln!("{}: {}", field.label(), message);
            }
            bail!("inventory record is invalid")
        }
        Err(err) => Err(err).context("failed to save inventory"),
    }
}

async fn handle_delete(context: &CliContext, args: DeleteArgs, json: bool) -> Result<()> {
    context.load().await?;
    let summary = context
        .state
        .inventory_service
        .remove(&args.ids)
        .await
        .context("failed to delete inventory")?;

    if json {
        print_json(&DeleteOutput {
            ids: &args.ids,
            removed: summary.removed,
        })?;
    }
    Ok(())
}

async fn handle_products(context: &CliContext, json: bool) -> Result<()> {
    context.load().await?;
    let products = context.state.inventory_service.products().await;

    if json {
        print_json(&products)?;
    } else {
        products.iter().for_each(|name| println!("- {}", name));
    }
    Ok(())
}

#[derive(Serialize)]
struct DeleteOutput<'a> {
    ids: &'a [String],
    removed: usize,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_row(row: &InventoryRow) {
    println!(
        "- {} • {} • {} {} @ {} • best before {}{}",
        row.id,
        row.name,
        row.amount,
        row.unit_of_measurement,
        row.average_price,
        if row.best_before_display.is_empty() {
            "-"
        } else {
            row.best_before_display.as_str()
        },
        if row.never_expires { " (never expires)" } else { "" }
    );
}

fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw).map_err(|_| format!("invalid decimal '{raw}'"))
}

fn parse_unit(raw: &str) -> Result<UnitOfMeasurement, String> {
    UnitOfMeasurement::parse_loose(raw).ok_or_else(|| {
        let known: Vec<&str> = UnitOfMeasurement::catalog().map(|(code, _)| code).collect();
        format!("unknown unit '{raw}', expected one of {}", known.join(", "))
    })
}
