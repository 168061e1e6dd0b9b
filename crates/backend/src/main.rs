use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use contracts::domain::a002_category::CategoryNode;
use contracts::enums::{CatalogResource, SupplierKind};
use contracts::usecases::u501_sync_catalog::SyncRequest;

use catalog_sync::domain::a001_product::ProductStore;
use catalog_sync::domain::a002_category::{build_tree, CategoryStore};
use catalog_sync::domain::{a003_supplier, a004_supplier_file, a005_supplier_record};
use catalog_sync::shared::cancel::CancelFlag;
use catalog_sync::shared::config::{self, Config};
use catalog_sync::shared::data::db;
use catalog_sync::shared::data::upsert::UpsertStore;
use catalog_sync::system;
use catalog_sync::usecases::u501_sync_catalog::{CatalogApiClient, CatalogSyncExecutor};
use catalog_sync::usecases::u502_import_supplier_file::{
    ImporterRegistry, SupplierImportExecutor,
};

#[derive(Parser, Debug)]
#[command(
    name = "catalog-sync",
    version,
    about = "Store catalog mirror and supplier price-list importer"
)]
struct Cli {
    /// Path to config.toml (default: next to the executable)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pull the remote catalog into the local database
    Sync {
        #[arg(value_enum, default_value_t = SyncTarget::All)]
        target: SyncTarget,
        /// Remote page size (default from config)
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Import a supplier price list
    Import {
        /// Supplier kind code (ALSO, EET)
        #[arg(value_parser = parse_kind)]
        kind: SupplierKind,
        path: PathBuf,
        /// MIME type stored with the file
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Print the category tree
    Categories,
    /// Show one product with details from its stored payload
    Product { id: i64 },
    /// List suppliers and their uploaded files
    Suppliers,
    /// Search imported supplier rows by SKU or name
    Records {
        query: String,
        /// Restrict to one supplier code
        #[arg(long)]
        supplier: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: u64,
    },
    /// Catalog counters and the remote store name
    Summary,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SyncTarget {
    Products,
    Categories,
    All,
}

impl SyncTarget {
    fn resources(self) -> Vec<CatalogResource> {
        match self {
            SyncTarget::Products => vec![CatalogResource::Products],
            SyncTarget::Categories => vec![CatalogResource::Categories],
            SyncTarget::All => SyncRequest::all().resources,
        }
    }
}

fn parse_kind(s: &str) -> Result<SupplierKind, String> {
    SupplierKind::from_code(s).ok_or_else(|| {
        let known: Vec<&str> = SupplierKind::all().iter().map(|k| k.code()).collect();
        format!("unknown supplier kind '{}', expected one of: {}", s, known.join(", "))
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    system::tracing::initialize()?;

    let config = match &cli.config {
        Some(path) => config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => config::load_config()?,
    };

    let db_path = config::get_database_path(&config)?;
    db::initialize_database(Some(&db_path.to_string_lossy())).await?;
    let conn = db::get_connection()?.clone();

    // Ctrl+C: прерываем текущую операцию между строками/страницами
    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, cancelling");
                cancel.cancel();
            }
        });
    }

    match cli.command {
        Command::Sync { target, page_size } => {
            let client = Arc::new(CatalogApiClient::new(&config.remote)?);
            let executor = CatalogSyncExecutor::new(client, conn, config.remote.page_size);
            let request = SyncRequest {
                resources: target.resources(),
                page_size,
            };
            for r in executor.sync(&request, &cancel).await? {
                println!(
                    "{:<12} fetched {:>6}  new {:>6}  changed {:>6}  unchanged {:>6}  skipped {:>4}",
                    r.resource, r.fetched, r.inserted, r.updated, r.unchanged, r.skipped
                );
            }
        }
        Command::Import {
            kind,
            path,
            content_type,
        } => {
            let executor =
                SupplierImportExecutor::new(Arc::new(ImporterRegistry::with_defaults()), conn);
            let request = contracts::usecases::u502_import_supplier_file::ImportRequest {
                kind,
                file_path: path.to_string_lossy().into_owned(),
                content_type,
            };
            let response = executor.execute(&request, &cancel).await?;
            println!(
                "Imported {} rows for {} (file id {})",
                response.record_count,
                kind.display_name(),
                response.supplier_file_id
            );
        }
        Command::Categories => {
            let categories = CategoryStore::new(conn).get_all().collect_all().await?;
            let tree = build_tree(categories);
            for node in &tree {
                print_node(node, 0);
            }
        }
        Command::Product { id } => match ProductStore::new(conn).get_details(id).await? {
            Some(details) => println!("{}", serde_json::to_string_pretty(&details)?),
            None => println!("Product {} not found", id),
        },
        Command::Suppliers => {
            for supplier in a003_supplier::repository::list_suppliers(&conn).await? {
                let rows =
                    a005_supplier_record::repository::count_by_supplier(&conn, supplier.id).await?;
                println!("{} ({}) - {} rows", supplier.name, supplier.code, rows);
                for file in a004_supplier_file::repository::list_files(&conn, supplier.id).await? {
                    println!(
                        "    #{} {} {} bytes, uploaded {}",
                        file.id,
                        file.file_name,
                        file.size,
                        file.uploaded_at.format("%Y-%m-%d %H:%M:%S")
                    );
                }
            }
        }
        Command::Records {
            query,
            supplier,
            limit,
        } => {
            let supplier_id = match supplier {
                Some(code) => Some(
                    a003_supplier::repository::get_by_code(&conn, &code)
                        .await?
                        .with_context(|| format!("Unknown supplier code {}", code))?
                        .id,
                ),
                None => None,
            };
            let records =
                a005_supplier_record::repository::search_records(&conn, supplier_id, &query, limit)
                    .await?;
            for r in records {
                println!(
                    "{:<20} {:<50} {:>10} {:>6}",
                    r.sku,
                    r.name.unwrap_or_default(),
                    r.price.map(|p| format!("{:.2}", p)).unwrap_or_default(),
                    r.stock.map(|s| s.to_string()).unwrap_or_default()
                );
            }
        }
        Command::Summary => print_summary(&config, conn).await?,
    }

    Ok(())
}

async fn print_summary(config: &Config, conn: sea_orm::DatabaseConnection) -> anyhow::Result<()> {
    let summary = ProductStore::new(conn).summary().await?;
    println!("Products:    {}", summary.product_count);
    println!("Categories:  {}", summary.category_count);
    match summary.last_synced_at {
        Some(at) => println!("Last sync:   {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("Last sync:   never"),
    }

    // Имя магазина: только если настроено подключение
    if !config.remote.store_id.trim().is_empty() {
        let client = CatalogApiClient::new(&config.remote)?;
        match client.fetch_store_name().await {
            Ok(Some(name)) => println!("Store:       {}", name),
            Ok(None) => {}
            Err(e) => tracing::warn!("Could not fetch store profile: {}", e),
        }
    }
    Ok(())
}

fn print_node(node: &CategoryNode, depth: usize) {
    let marker = if node.category.enabled { "" } else { " (disabled)" };
    println!(
        "{}{} [{}]{}",
        "  ".repeat(depth),
        node.category.name,
        node.category.id,
        marker
    );
    for child in &node.children {
        print_node(child, depth + 1);
    }
}
