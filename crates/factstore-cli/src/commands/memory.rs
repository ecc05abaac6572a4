use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use factstore::memory::types::{MemoryRecord, NewMemory, Upserted, labels};
use factstore::{FactStore, SessionKey};

use crate::error::CliResult;
use crate::output::{OutputFormat, format_timestamp, format_ttl, truncate_string};

#[derive(Parser)]
pub struct MemoryCommand {
    #[clap(subcommand)]
    pub command: MemorySubcommand,
}

#[derive(Subcommand)]
pub enum MemorySubcommand {
    #[clap(about = "Append a memory, collapsing duplicates")]
    Add(AddArgs),

    #[clap(about = "List every stored memory for a session, expired ones included")]
    List(ListArgs),

    #[clap(about = "Refresh a matching memory or create it")]
    Upsert(UpsertArgs),

    #[clap(about = "Rank live memories against a query")]
    Search(SearchArgs),

    #[clap(about = "Extract facts from a user utterance and store them")]
    Remember(RememberArgs),
}

#[derive(Parser)]
pub struct AddArgs {
    #[clap(help = "Session key")]
    pub session: SessionKey,

    #[clap(help = "Memory text")]
    pub text: String,

    #[clap(long, short, default_value = labels::FACT, help = "Memory label")]
    pub label: String,

    #[clap(long, help = "Time-to-live in milliseconds")]
    pub ttl_ms: Option<u64>,
}

#[derive(Parser)]
pub struct ListArgs {
    #[clap(help = "Session key")]
    pub session: SessionKey,
}

#[derive(Parser)]
pub struct UpsertArgs {
    #[clap(help = "Session key")]
    pub session: SessionKey,

    #[clap(help = "Memory label (name, preference, fact, ...)")]
    pub label: String,

    #[clap(help = "Memory text")]
    pub text: String,

    #[clap(long, help = "Time-to-live in milliseconds (keeps the existing TTL if omitted)")]
    pub ttl_ms: Option<u64>,
}

#[derive(Parser)]
pub struct SearchArgs {
    #[clap(help = "Session key")]
    pub session: SessionKey,

    #[clap(help = "Free-text query")]
    pub query: String,

    #[clap(long, short, help = "Maximum number of results (defaults to config)")]
    pub limit: Option<usize>,
}

#[derive(Parser)]
pub struct RememberArgs {
    #[clap(help = "Session key")]
    pub session: SessionKey,

    #[clap(help = "User utterance")]
    pub utterance: String,
}

impl MemoryCommand {
    pub async fn execute(&self, store: &FactStore, format: OutputFormat) -> CliResult<()> {
        match &self.command {
            MemorySubcommand::Add(args) => Self::add(store, args, format).await,
            MemorySubcommand::List(args) => Self::list(store, args, format).await,
            MemorySubcommand::Upsert(args) => Self::upsert(store, args, format).await,
            MemorySubcommand::Search(args) => Self::search(store, args, format).await,
            MemorySubcommand::Remember(args) => Self::remember(store, args, format).await,
        }
    }

    async fn add(store: &FactStore, args: &AddArgs, format: OutputFormat) -> CliResult<()> {
        let mut memory = NewMemory::new(args.label.clone(), args.text.clone());
        memory.ttl_ms = args.ttl_ms;

        let record = store.add(&args.session, memory).await?;

        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
            OutputFormat::Table => {
                println!("Memory stored.");
                println!("ID: {}", record.id);
            }
        }

        Ok(())
    }

    async fn list(store: &FactStore, args: &ListArgs, format: OutputFormat) -> CliResult<()> {
        let records = store.list(&args.session).await?;
        print_records(&records, format, "No memories stored for this session.")
    }

    async fn upsert(store: &FactStore, args: &UpsertArgs, format: OutputFormat) -> CliResult<()> {
        let upserted = store
            .upsert(&args.session, &args.label, &args.text, args.ttl_ms)
            .await?;
        print_upserted(&[upserted], format)
    }

    async fn search(store: &FactStore, args: &SearchArgs, format: OutputFormat) -> CliResult<()> {
        let records = store
            .search(&args.session, &args.query, args.limit)
            .await?;
        print_records(&records, format, "No matching memories.")
    }

    async fn remember(
        store: &FactStore,
        args: &RememberArgs,
        format: OutputFormat,
    ) -> CliResult<()> {
        let stored = store.remember(&args.session, &args.utterance).await?;
        print_upserted(&stored, format)
    }
}

fn print_records(records: &[MemoryRecord], format: OutputFormat, empty: &str) -> CliResult<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Table => {
            if records.is_empty() {
                println!("{empty}");
                return Ok(());
            }

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL_CONDENSED)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(["ID", "Label", "Text", "TTL", "Created", "Updated"]);

            for record in records {
                table.add_row([
                    truncate_string(&record.id.to_string(), 8),
                    record.label.clone(),
                    truncate_string(&record.text, 50),
                    format_ttl(record.ttl_ms),
                    format_timestamp(&record.created_at),
                    format_timestamp(&record.updated_at),
                ]);
            }

            println!("{table}");
            println!("\nTotal: {} memories", records.len());
        }
    }

    Ok(())
}

fn print_upserted(upserted: &[Upserted], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(upserted)?),
        OutputFormat::Table => {
            if upserted.is_empty() {
                println!("Nothing to store.");
                return Ok(());
            }
            for item in upserted {
                println!(
                    "{:?} [{}] {} ({})",
                    item.outcome, item.record.label, item.record.text, item.record.id
                );
            }
        }
    }

    Ok(())
}
