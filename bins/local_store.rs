use std::process::ExitCode;

use anyhow::{anyhow, Context};
use configs::{AppConfig, LogFormat};
use dotenvy::dotenv;
use serde_json::Value;
use store::{open_host, HostStorage, SharedHost, StorageAccessor};
use tracing::{debug, error, info};
use uuid::Uuid;

const USAGE: &str = "usage: local-store <set KEY JSON | get KEY | remove KEY | keys | clear>";

enum Command {
    Set { key: String, value: Value },
    Get { key: String },
    Remove { key: String },
    Keys,
    Clear,
}

impl Command {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        let arg = |i: usize| args.get(i).cloned().ok_or_else(|| anyhow!("missing argument\n{USAGE}"));
        match args.first().map(String::as_str) {
            Some("set") => {
                let raw = arg(2)?;
                // Bare text that is not JSON is stored as a JSON string.
                let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
                Ok(Command::Set { key: arg(1)?, value })
            }
            Some("get") => Ok(Command::Get { key: arg(1)? }),
            Some("remove") => Ok(Command::Remove { key: arg(1)? }),
            Some("keys") => Ok(Command::Keys),
            Some("clear") => Ok(Command::Clear),
            Some(other) => Err(anyhow!("unknown command `{other}`\n{USAGE}")),
            None => Err(anyhow!(USAGE)),
        }
    }
}

/// Missing or invalid config falls back to defaults; the reason is logged once tracing is up.
fn load_config() -> (AppConfig, Option<anyhow::Error>) {
    match AppConfig::load_and_validate() {
        Ok(cfg) => (cfg, None),
        Err(e) => {
            // env overrides still apply without a config file
            let mut cfg = AppConfig::default();
            if cfg.normalize_and_validate().is_err() {
                cfg = AppConfig::default();
            }
            (cfg, Some(e))
        }
    }
}

fn init_logging(cfg: &AppConfig) {
    let fallback = cfg.logging.filter.as_deref();
    match cfg.logging.format {
        LogFormat::Compact => common::utils::logging::init_logging_default(fallback),
        LogFormat::Json => common::utils::logging::init_logging_json(fallback),
    }
    info!(service = "local-store", event = "logger_init", "tracing subscriber initialized");
}

/// Absent values print as `null`.
fn render(value: Option<Value>) -> String {
    value.unwrap_or(Value::Null).to_string()
}

fn run(store: &StorageAccessor<SharedHost>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Set { key, value } => {
            store.set_item(&key, &value);
            info!(event = "set", %key, "value stored");
        }
        Command::Get { key } => println!("{}", render(store.get_item(&key))),
        Command::Remove { key } => {
            let existed = store.host().remove(&key).context("remove failed")?;
            info!(event = "remove", %key, existed, "record removed");
        }
        Command::Keys => {
            for key in store.host().keys().context("listing keys failed")? {
                println!("{key}");
            }
        }
        Command::Clear => {
            store.host().clear().context("clear failed")?;
            info!(event = "clear", "all records removed");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    // .env may carry RUST_LOG, CONFIG_PATH or LOCAL_STORE_PATH
    dotenv().ok();
    let (cfg, config_err) = load_config();
    init_logging(&cfg);
    if let Some(e) = config_err {
        debug!(event = "config_default", reason = %e, path = %cfg.storage.path, "using default configuration");
    }

    let run_id = Uuid::new_v4();
    let pid = std::process::id();

    std::panic::set_hook(Box::new(move |info| {
        error!(service = "local-store", event = "panic", %run_id, pid, message = %info, "unhandled panic occurred");
    }));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let host = match open_host(&cfg.storage) {
        Ok(h) => h,
        Err(e) => {
            error!(service = "local-store", event = "host_open_failed", error = %e, "cannot open host storage");
            return ExitCode::FAILURE;
        }
    };
    let store = StorageAccessor::new(host);

    match run(&store, command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(service = "local-store", event = "command_failed", %run_id, error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}
