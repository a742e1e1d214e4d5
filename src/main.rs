use chrono::Utc;
use clap::Parser;
use lifeos::application::init::init;
use lifeos::application::{seed_workspace, ConfigService, InsightService, ListOptions, RecordService};
use lifeos::cli::output::{
    format_agenda, format_balance, format_kinds, format_overview, format_records, format_rows,
    format_signals, short_id,
};
use lifeos::cli::{parse_date, Cli, Commands};
use lifeos::domain::intelligence::SignalCategory;
use lifeos::domain::system_logs::LogLevel;
use lifeos::domain::tags::TagQuery;
use lifeos::domain::StoreKind;
use lifeos::error::{LifeosError, Result};
use lifeos::infrastructure::logging::{init_logging, level_for_verbosity};
use lifeos::infrastructure::FileSystemRepository;
use std::io::Read;
use std::str::FromStr;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(level_for_verbosity(cli.verbose)) {
        eprintln!("Warning: {}", e);
    }

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            log::debug!("event=exit code={}", e.exit_code());
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

/// Record JSON from the argument, or stdin when it is "-"
fn read_json(arg: String) -> Result<String> {
    if arg != "-" {
        return Ok(arg);
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn records() -> Result<RecordService> {
    Ok(RecordService::new(FileSystemRepository::discover()?))
}

fn insights() -> Result<InsightService> {
    Ok(InsightService::new(FileSystemRepository::discover()?))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { path, owner, seed } => {
            let done = init(&path, owner, seed)?;
            println!("Initialized lifeos workspace at {}", path.display());
            println!("Owner: {}", done.config.owner);
            if let Some(report) = done.seeded {
                println!("Seeded {} stores with sample data", report.seeded.len());
            }
            Ok(())
        }
        Commands::Config { key, value, list } => {
            let service = ConfigService::new(FileSystemRepository::discover()?);

            if list {
                let config = service.list()?;
                println!("owner = {}", config.owner);
                println!("upcoming_days = {}", config.upcoming_days);
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(&k, &v)?;
                    println!("Set {} = {}", k, v);
                } else {
                    println!("{}", service.get(&k)?);
                }
            } else {
                println!("Usage: lifeos config [--list | <key> [<value>]]");
                println!("Valid keys: owner, upcoming_days");
            }
            Ok(())
        }
        Commands::Kinds => {
            print!("{}", format_kinds());
            Ok(())
        }
        Commands::Add { kind, json } => {
            let kind = StoreKind::from_str(&kind)?;
            let row = records()?.add(kind, &read_json(json)?)?;
            println!("Added {}  {}", short_id(&row.id), row.summary);
            println!("id: {}", row.id);
            Ok(())
        }
        Commands::Update { kind, id, json } => {
            let kind = StoreKind::from_str(&kind)?;
            let row = records()?.update(kind, &id, &read_json(json)?)?;
            println!("Updated {}  {}", short_id(&row.id), row.summary);
            Ok(())
        }
        Commands::Delete { kind, id } => {
            let kind = StoreKind::from_str(&kind)?;
            let deleted = records()?.delete(kind, &id)?;
            println!("Deleted {}  {}", short_id(&deleted.row.id), deleted.row.summary);
            if deleted.cascaded > 0 {
                println!("Also removed {} linked record(s)", deleted.cascaded);
            }
            Ok(())
        }
        Commands::Show { kind, id } => {
            let kind = StoreKind::from_str(&kind)?;
            println!("{}", records()?.show(kind, &id)?);
            Ok(())
        }
        Commands::List { kind, tag, limit } => {
            let kind = StoreKind::from_str(&kind)?;
            let options = ListOptions {
                tags: tag.as_deref().map(TagQuery::parse).transpose()?,
                limit,
            };
            let rows = records()?.list(kind, &options)?;
            println!("{}", format_rows(&rows).trim_end());
            Ok(())
        }
        Commands::Complete { kind, id } => {
            let kind = StoreKind::from_str(&kind)?;
            let row = records()?.complete(kind, &id)?;
            println!("Completed {}  {}", short_id(&row.id), row.summary);
            Ok(())
        }
        Commands::Upcoming { days } => {
            let agenda = insights()?.upcoming(days, Utc::now())?;
            println!("{}", format_agenda(&agenda).trim_end());
            Ok(())
        }
        Commands::Signals { category } => {
            let category = category
                .as_deref()
                .map(SignalCategory::from_str)
                .transpose()
                .map_err(LifeosError::Config)?;
            let groups = insights()?.signals(category)?;
            println!("{}", format_signals(&groups).trim_end());
            Ok(())
        }
        Commands::Balance { from, to } => {
            let from = from.as_deref().map(parse_date).transpose()?;
            let to = to.as_deref().map(parse_date).transpose()?;
            let balance = insights()?.balance(from, to)?;
            print!("{}", format_balance(&balance));
            Ok(())
        }
        Commands::StaleContacts { days } => {
            let stale = insights()?.stale_contacts(days, Utc::now())?;
            println!("{}", format_records(&stale).trim_end());
            Ok(())
        }
        Commands::Toggle { id } => {
            let device = insights()?.toggle(&id)?;
            let state = if device.powered { "on" } else { "off" };
            println!("{} / {} is now {}", device.room, device.name, state);
            Ok(())
        }
        Commands::Check { host } => {
            let rules = insights()?.check_host(&host)?;
            if rules.is_empty() {
                println!("{} is allowed", host);
            } else {
                println!("{} is blocked by:", host);
                print!("{}", format_records(&rules));
            }
            Ok(())
        }
        Commands::Logs { min_level, clear } => {
            let service = insights()?;
            if clear {
                let removed = service.clear_logs()?;
                println!("Cleared {} log entries", removed);
            } else {
                let level = LogLevel::from_str(&min_level).map_err(LifeosError::Config)?;
                let entries = service.logs(level)?;
                println!("{}", format_records(&entries).trim_end());
            }
            Ok(())
        }
        Commands::Seed => {
            let repo = FileSystemRepository::discover()?;
            let report = seed_workspace(&repo, true, Utc::now())?;
            println!("Seeded: {}", list_or_none(&report.seeded));
            println!("Skipped (not empty): {}", list_or_none(&report.skipped));
            Ok(())
        }
        Commands::Overview => {
            let overview = insights()?.overview()?;
            print!("{}", format_overview(&overview));
            Ok(())
        }
    }
}

fn list_or_none(keys: &[&str]) -> String {
    if keys.is_empty() {
        "none".to_string()
    } else {
        keys.join(", ")
    }
}
