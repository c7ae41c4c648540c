use chrono::{NaiveDate, NaiveTime};
use mindbreeze::cli::{
    constraint_value, order_args, parse_constraint_arg, Cli, Commands, ConfigAction,
};
use mindbreeze::config::Config;
use mindbreeze::error::{MindbreezeError, Result};
use mindbreeze::http::ReqwestClient;
use mindbreeze::response::NormalizedResponse;
use mindbreeze::session::{FileTokenStore, PaginationSession};
use mindbreeze::QueryBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    match cli.command {
        Commands::Search {
            query,
            page,
            per_page,
            order,
            direction,
            datasource,
            from,
            to,
            constraints,
            session,
            dry_run,
            json,
        } => {
            let options = SearchOptions {
                query,
                page,
                per_page,
                order,
                direction,
                datasource,
                date_range: from.zip(to),
                constraints,
                session,
                dry_run,
                json,
            };
            cmd_search(cli.config, options)?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_filter = if verbose {
        "mindbreeze=debug"
    } else {
        "mindbreeze=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

struct SearchOptions {
    query: String,
    page: i64,
    per_page: Option<u32>,
    order: Option<String>,
    direction: String,
    datasource: Option<String>,
    date_range: Option<(String, String)>,
    constraints: Vec<String>,
    session: String,
    dry_run: bool,
    json: bool,
}

fn cmd_search(config_path: Option<PathBuf>, options: SearchOptions) -> Result<()> {
    let config = load_config(config_path)?;

    let data_dir = expand_path(&config.storage.data_dir)?;
    let store = Arc::new(FileTokenStore::new(&data_dir)?);
    let session = PaginationSession::new(store, options.session);
    let http = Arc::new(ReqwestClient::new(config.endpoint.timeout())?);

    let mut builder = QueryBuilder::from_config(&config, http, session);
    builder.set_query(options.query).set_page(options.page);

    if let Some(per_page) = options.per_page {
        builder.set_per_page(per_page);
    }

    let (field, direction) = order_args(options.order.as_deref(), &options.direction);
    builder.set_order(field, direction)?;

    if let Some(name) = &options.datasource {
        if !config.datasources.contains_key(name) {
            tracing::warn!("Datasource constraint '{}' is not configured, ignoring", name);
        }
        builder.add_datasource_constraint(name)?;
    }

    if let Some((from, to)) = &options.date_range {
        builder.add_date_constraint(parse_date_arg(from, false)?, parse_date_arg(to, true)?)?;
    }

    for arg in &options.constraints {
        let (label, kind, value) = parse_constraint_arg(arg).ok_or_else(|| {
            MindbreezeError::invalid_argument(format!(
                "Constraint must look like LABEL:KIND:VALUE, got '{}'",
                arg
            ))
        })?;
        let data = constraint_value(&kind, &value)?;
        builder.add_constraint(&label, &kind, &data)?;
    }

    if options.dry_run {
        let data = builder.compile_data()?;
        println!("{}", to_pretty_json(&data)?);
        return Ok(());
    }

    tracing::info!("Searching {} (page {})", builder.url(), builder.page());
    let response = builder.send()?;

    if options.json {
        println!("{}", to_pretty_json(&response)?);
    } else {
        print_response(&response, builder.page());
    }

    Ok(())
}

fn print_response(response: &NormalizedResponse, page: u64) {
    if response.is_empty() {
        println!("No results");
    }

    for (i, record) in response.records.iter().enumerate() {
        let title = record
            .get_str("title")
            .map(mindbreeze::response::strip_tags)
            .or_else(|| record.fields.get("id").map(|id| id.to_string()))
            .unwrap_or_else(|| "(untitled)".to_string());
        println!("{:>3}. {}", i + 1, title);
    }

    let pagination = &response.pagination;
    println!();
    println!("Page {} - about {} results", page, pagination.total);
    if pagination.prev == Some(true) {
        println!("  previous page available");
    }
    if pagination.next == Some(true) {
        println!("  next page available (--page {})", page + 1);
    }

    if let Some(suggestion) = &response.suggestion {
        println!("Did you mean: {}", suggestion);
    }
}

fn cmd_config(config_path: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            println!("{}", to_pretty_json(&config)?);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            Config::load(&path)?;
            println!("✓ Configuration is valid: {}", path.display());
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };
            init_config(&path, force)?;
        }
    }

    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!(
            "Configuration already exists: {} (use --force to overwrite)",
            path.display()
        );
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| MindbreezeError::Io {
            source: e,
            context: format!("Failed to create config directory: {:?}", parent),
        })?;
    }

    let content = include_str!("../config-templates/config.toml");
    std::fs::write(path, content).map_err(|e| MindbreezeError::Io {
        source: e,
        context: format!("Failed to write config.toml: {:?}", path),
    })?;

    println!("✓ Configuration written to {}", path.display());
    Ok(())
}

fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    Config::load(&path)
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| MindbreezeError::Json {
        source: e,
        context: "Failed to serialize output".to_string(),
    })
}

/// Parse `YYYY-MM-DD` or Unix seconds; dates resolve to the start of the
/// day, or its last second when `end_of_day` is set
fn parse_date_arg(arg: &str, end_of_day: bool) -> Result<i64> {
    if let Ok(seconds) = arg.parse::<i64>() {
        return Ok(seconds);
    }

    let date = NaiveDate::parse_from_str(arg, "%Y-%m-%d").map_err(|_| {
        MindbreezeError::invalid_argument(format!(
            "Date must be YYYY-MM-DD or Unix seconds, got '{}'",
            arg
        ))
    })?;
    let time = if end_of_day {
        NaiveTime::from_hms_opt(23, 59, 59)
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)
    }
    .ok_or_else(|| MindbreezeError::invalid_argument("Invalid time of day"))?;

    Ok(date.and_time(time).and_utc().timestamp())
}

fn expand_path(path: &Path) -> Result<PathBuf> {
    let path_str = path
        .to_str()
        .ok_or_else(|| MindbreezeError::Config("Invalid path encoding".to_string()))?;

    if let Some(stripped) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(|| {
            MindbreezeError::Config("Cannot determine home directory".to_string())
        })?;
        Ok(home.join(stripped))
    } else {
        Ok(path.to_path_buf())
    }
}
