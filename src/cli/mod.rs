pub mod blocks;
pub mod categories;
pub mod journal;
pub mod output;
pub mod report;
pub mod sync;

use std::path::PathBuf;

use anyhow::Result;
use blocks::{add_block, edit_block, print_blocks, remove_block, AddCommand, EditCommand};
use categories::{process_category_command, CategoryCommand};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use journal::{process_goals_command, process_reflect_command, GoalsCommand};
use output::{analysis::analyze_period, period::DateRange};
use report::{print_report, ReportCommand};
use sync::{export_rows, import_rows, read_rows, write_rows, ExportCommand};
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    aggregate::MalformedTimePolicy,
    config::load_config,
    storage::{block_storage::BlockStorage, ProfileStorage},
    utils::{
        clock::{Clock, DefaultClock},
        dir::{application_path, profile_path, DEFAULT_PROFILE},
        logging::{enable_logging, CLI_PREFIX},
        time::parse_date,
    },
};

#[derive(Parser, Debug)]
#[command(name = "Timeblock", version, long_about = None)]
#[command(about = "Record your day as time blocks and see where the time went", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_PROFILE,
        help = "Profile whose data is used"
    )]
    profile: String,
    #[arg(
        long,
        short,
        global = true,
        help = "Day to work with. Examples are \"yesterday\", \"3 days ago\", \"15/03/2025\", \"2025-03-15\". Defaults to today"
    )]
    date: Option<String>,
    #[arg(long, global = true, help = "Ignore blocks whose category isn't registered")]
    strict_categories: bool,
    #[arg(
        long,
        global = true,
        help = "Read malformed times as midnight instead of skipping blocks"
    )]
    lenient_times: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Record a new time block")]
    Add {
        #[command(flatten)]
        command: AddCommand,
    },
    #[command(about = "Change fields of a time block")]
    Edit {
        #[command(flatten)]
        command: EditCommand,
    },
    #[command(about = "Delete a time block")]
    Remove {
        #[arg(help = "Id of the block")]
        id: String,
    },
    #[command(about = "Show time blocks of the day")]
    List,
    #[command(about = "Show time spent per category")]
    Report {
        #[command(flatten)]
        command: ReportCommand,
    },
    #[command(about = "Manage categories")]
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },
    #[command(about = "Write or show the reflection of the day")]
    Reflect {
        #[arg(help = "Text of the reflection. Shows the saved one when absent")]
        text: Option<String>,
    },
    #[command(about = "Manage goals of the week")]
    Goals {
        #[command(subcommand)]
        command: GoalsCommand,
    },
    #[command(about = "Export time blocks as spreadsheet rows in json")]
    Export {
        #[command(flatten)]
        command: ExportCommand,
    },
    #[command(about = "Import spreadsheet rows produced by export")]
    Import {
        #[arg(help = "Json file with rows")]
        file: PathBuf,
    },
}

/// Resolves a date given on the command line. Relative dates are counted from [Clock::today].
fn resolve_date(input: Option<&str>, clock: &impl Clock) -> Result<NaiveDate> {
    let today = clock.today();
    match input {
        Some(input) => parse_date(input, today),
        None => Ok(today),
    }
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let application_path = application_path(args.dir)?;
    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &application_path, logging_level, args.log)?;

    let mut config = load_config(&application_path).await?;
    if args.strict_categories {
        config.strict_categories = true;
    }
    if args.lenient_times {
        config.malformed_times = MalformedTimePolicy::Midnight;
    }
    debug!("Using {config:?}");

    let storage = ProfileStorage::open(&profile_path(&application_path, &args.profile)?)?;
    let clock = DefaultClock;
    let date = resolve_date(args.date.as_deref(), &clock)?;

    match args.commands {
        Commands::Add { command } => {
            let catalog = storage.categories.load().await?;
            let block = add_block(
                &storage.blocks,
                &catalog,
                date,
                command,
                &config.default_start_time,
            )
            .await?;
            println!("{}", block.id);
            Ok(())
        }
        Commands::Edit { command } => {
            edit_block(&storage.blocks, date, command).await?;
            Ok(())
        }
        Commands::Remove { id } => {
            remove_block(&storage.blocks, date, &id).await?;
            Ok(())
        }
        Commands::List => {
            let catalog = storage.categories.load().await?;
            let blocks = storage.blocks.get_blocks_for(date).await?;
            print_blocks(date, &blocks, &catalog);
            Ok(())
        }
        Commands::Report { command } => {
            let catalog = storage.categories.load().await?;
            let keys = catalog.keys().map(String::from).collect::<Vec<_>>();
            let report =
                analyze_period(&storage.blocks, &keys, config.policy(), command.period, date)
                    .await?;
            print_report(&report, &catalog, &command);
            Ok(())
        }
        Commands::Category { command } => {
            process_category_command(&storage.categories, command).await
        }
        Commands::Reflect { text } => process_reflect_command(&storage.journal, date, text).await,
        Commands::Goals { command } => {
            process_goals_command(&storage.journal, date, command).await
        }
        Commands::Export { command } => {
            let from = resolve_date(command.from.as_deref().or(args.date.as_deref()), &clock)?;
            let to = resolve_date(command.to.as_deref().or(args.date.as_deref()), &clock)?;
            let rows = export_rows(&storage.blocks, DateRange::new(from, to)).await?;
            write_rows(&rows, command.output).await
        }
        Commands::Import { file } => {
            let rows = read_rows(file).await?;
            let imported = import_rows(&storage.blocks, rows).await?;
            println!("Imported {imported} blocks");
            Ok(())
        }
    }
}
