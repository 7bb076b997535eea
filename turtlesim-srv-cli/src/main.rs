use std::collections::BTreeSet;

use anyhow::{bail, Context, Result};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use turtlesim_srv::{registry, srv, Config, MessageKind, OutputFormat, ServiceType};

#[derive(Parser)]
#[command(name = "turtlesim-srv")]
#[command(version, about = "Inspect, encode and decode turtlesim service messages")]
struct Cli {
    #[arg(short, long, global = true, help = "Path to a TOML config file")]
    config: Option<Utf8PathBuf>,

    #[arg(short, long, global = true, help = "Output format: text or json")]
    format: Option<OutputFormat>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered services
    List {
        #[arg(short, long, help = "Include only these services (can be specified multiple times)")]
        include: Vec<String>,

        #[arg(short, long, help = "Exclude these services (can be specified multiple times)")]
        exclude: Vec<String>,
    },
    /// Print the definition and checksums of a service
    Show {
        #[arg(help = "Service name, e.g. Spawn or turtlesim/Spawn")]
        name: String,
    },
    /// Encode a JSON message into hex-encoded ROS1 bytes
    Encode {
        #[command(flatten)]
        target: Target,

        #[arg(help = "Message as a JSON object")]
        json: String,
    },
    /// Decode hex-encoded ROS1 bytes into JSON
    Decode {
        #[command(flatten)]
        target: Target,

        #[arg(help = "Message bytes as hex")]
        bytes: String,

        #[arg(long, help = "Decode through the typed bindings instead of the parsed definition")]
        typed: bool,
    },
}

#[derive(Args)]
struct Target {
    #[arg(help = "Service name, e.g. Spawn or turtlesim/Spawn")]
    name: String,

    #[arg(long, help = "Use the response message instead of the request")]
    response: bool,
}

impl Target {
    fn kind(&self) -> MessageKind {
        if self.response {
            MessageKind::Response
        } else {
            MessageKind::Request
        }
    }
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose {
        "turtlesim_srv=debug,info"
    } else {
        "turtlesim_srv=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            Config::from_file(path).with_context(|| format!("failed to load config from {path}"))?
        }
        None => Config::default(),
    };
    if let Some(format) = cli.format {
        config = config.set_format(format);
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = load_config(&cli)?;
    debug!(format = %config.format(), "configuration loaded");

    match &cli.command {
        Commands::List { include, exclude } => list(config, include, exclude),
        Commands::Show { name } => show(&config, name),
        Commands::Encode { target, json } => {
            let service = registry().lookup(&target.name)?;
            let bytes = srv::encode_json(service.name(), target.kind(), json)
                .with_context(|| format!("failed to encode {} {}", service.datatype(), target.kind()))?;
            match config.format() {
                OutputFormat::Text => println!("{}", hex::encode(bytes)),
                OutputFormat::Json => println!("{}", json!({ "hex": hex::encode(bytes) })),
            }
            Ok(())
        }
        Commands::Decode {
            target,
            bytes,
            typed,
        } => {
            let service = registry().lookup(&target.name)?;
            let bytes = hex::decode(bytes.trim()).context("input is not valid hex")?;
            let value = if *typed {
                srv::decode_json(service.name(), target.kind(), &bytes)?
            } else {
                service.decode(target.kind(), &bytes)?.to_json()
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
    }
}

fn list(config: Config, include: &[String], exclude: &[String]) -> Result<()> {
    if !include.is_empty() && !exclude.is_empty() {
        bail!("Cannot use both --include and --exclude at the same time");
    }

    let mut config = config;
    if !include.is_empty() {
        config = config
            .set_exclude_services(None)
            .set_include_services(Some(include.iter().cloned().collect::<BTreeSet<_>>()));
    } else if !exclude.is_empty() {
        config = config
            .set_include_services(None)
            .set_exclude_services(Some(exclude.iter().cloned().collect::<BTreeSet<_>>()));
    }
    config.validate()?;

    let services: Vec<&ServiceType> = registry()
        .iter()
        .filter(|(name, _)| config.service_filter().matches(*name))
        .map(|(_, service)| service)
        .collect();
    info!(count = services.len(), "listing services");

    match config.format() {
        OutputFormat::Text => {
            for service in services {
                println!("{:<28} {}", service.datatype(), service.md5sum());
            }
        }
        OutputFormat::Json => {
            let entries: Vec<_> = services.into_iter().map(service_json).collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}

fn show(config: &Config, name: &str) -> Result<()> {
    let service = registry().lookup(name)?;
    match config.format() {
        OutputFormat::Text => {
            println!("{} [{}]", service.datatype(), service.md5sum());
            for kind in [MessageKind::Request, MessageKind::Response] {
                let message = service.message(kind);
                println!("\n{} [{}]", message.datatype(), message.md5sum());
                print!("{}", message.definition());
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&service_json(service))?),
    }
    Ok(())
}

fn service_json(service: &ServiceType) -> serde_json::Value {
    let message_json = |kind| {
        let message = service.message(kind);
        json!({
            "datatype": message.datatype(),
            "md5sum": message.md5sum(),
            "definition": message.definition()
        })
    };
    json!({
        "name": service.name().as_str(),
        "datatype": service.datatype(),
        "md5sum": service.md5sum(),
        "request": message_json(MessageKind::Request),
        "response": message_json(MessageKind::Response)
    })
}
