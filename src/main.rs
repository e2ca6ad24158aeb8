use anyhow::{Context, Result};
use console::style;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use ipsight::config::{LogLevel, ResolverConfig, DEFAULT_USER_AGENT};
use ipsight::report::{to_json, RecordReport};
use ipsight::{IpVersion, Resolution, ResolveError, Resolver};

#[derive(Debug, Parser)]
#[clap(name = "ipsight", version, about = "Show your public IP addresses and where they point")]
pub struct App {
    #[clap(subcommand)]
    command: Command,

    /// Log verbosity
    #[clap(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    log_level: LogLevel,

    /// Per-request timeout; the HTTP client default applies when unset
    #[clap(long, global = true)]
    timeout_seconds: Option<u64>,

    /// User-Agent sent to the lookup services
    #[clap(long, default_value = DEFAULT_USER_AGENT, global = true)]
    user_agent: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve both the IPv4 and the IPv6 address
    Lookup {
        /// Print the records as JSON
        #[clap(long)]
        json: bool,
    },
    /// Resolve a single IP version
    Ip {
        /// 4 or 6
        version: IpVersion,
        /// Print the record as JSON
        #[clap(long)]
        json: bool,
        /// Only the address, location and network owner
        #[clap(short, long)]
        brief: bool,
    },
    /// List the lookup endpoints in the order they are tried
    Providers,
}

impl App {
    fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            timeout: self.timeout_seconds.map(Duration::from_secs),
            user_agent: self.user_agent.clone(),
            ..ResolverConfig::default()
        }
    }
}

async fn lookup(resolver: &Resolver, json: bool) -> Result<()> {
    let found = resolver.resolve_both().await?;
    if json {
        println!("{}", to_json(&found)?);
    } else {
        print!("{}", found);
        if found.status() == Resolution::Partial {
            log::info!("only one IP version could be resolved");
        }
    }
    Ok(())
}

async fn single(resolver: &Resolver, version: IpVersion, json: bool, brief: bool) -> Result<()> {
    let record = resolver.resolve(version).await?;
    if json {
        println!("{}", to_json(&record)?);
    } else if brief {
        print!("{}", record);
    } else {
        print!("{}", RecordReport(&record));
    }
    Ok(())
}

fn providers(config: &ResolverConfig) -> Result<()> {
    for version in [IpVersion::V4, IpVersion::V6] {
        println!("{}", style(format!("IPv{}", version)).bold().red());
        for (rank, endpoint) in config.endpoints(version).iter().enumerate() {
            println!("  {}. {}", rank + 1, style(endpoint).green());
        }
    }
    Ok(())
}

async fn run(cli: &App) -> Result<()> {
    let resolver = Resolver::new(cli.resolver_config()).context("Failed to build HTTP client")?;
    match &cli.command {
        Command::Lookup { json } => lookup(&resolver, *json).await,
        Command::Ip {
            version,
            json,
            brief,
        } => single(&resolver, *version, *json, *brief).await,
        Command::Providers => providers(resolver.config()),
    }
}

#[tokio::main]
async fn main() {
    let cli = App::parse();
    if let Err(e) = ipsight::logger::init_logger(cli.log_level.into()) {
        eprintln!("{}", e);
    }

    match run(&cli).await {
        Ok(()) => process::exit(0),
        Err(e) => {
            if e.downcast_ref::<ResolveError>().is_some() {
                eprintln!("{}", style(&e).red());
            } else {
                eprintln!("Application error: {:#}", e);
            }
            process::exit(1);
        }
    }
}
