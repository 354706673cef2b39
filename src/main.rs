//! thumbflow - Responsive thumbnail URL resolution.
//!
//! This binary resolves thumbnail-service URLs offline and probes the local
//! runtime's decoder capabilities.

use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use thumbflow::{
    config::{Cli, Command, ProbeArgs, ResolveArgs, ResolveOutputFormat},
    format::webp_supported,
    resolve::resolve_url,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Resolve(args) => run_resolve(args).await,
        Command::Probe(args) => run_probe(args).await,
    }
}

// =============================================================================
// Resolve Command
// =============================================================================

async fn run_resolve(args: ResolveArgs) -> ExitCode {
    if let Err(e) = args.validate() {
        error!("Invalid arguments: {}", e);
        return ExitCode::FAILURE;
    }

    // Negotiate the transfer format: either trust the flag or probe the
    // local decoder the way a mounted component would.
    let webp = if args.negotiate {
        webp_supported().await
    } else {
        args.webp
    };

    let config = args.resolver_config();
    let options = args.options(webp);
    let resolved = resolve_url(&args.src, &options, &config);

    match args.format {
        ResolveOutputFormat::Url => {
            println!("{}", resolved);
        }
        ResolveOutputFormat::Json => {
            let json = serde_json::json!({
                "src": args.src,
                "options": options,
                "resolved": resolved,
                "passthrough": resolved == args.src,
            });
            println!("{}", serde_json::to_string_pretty(&json).unwrap());
        }
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Probe Command
// =============================================================================

async fn run_probe(args: ProbeArgs) -> ExitCode {
    let supported = webp_supported().await;

    if args.json {
        let json = serde_json::json!({ "webp": supported });
        println!("{}", serde_json::to_string_pretty(&json).unwrap());
    } else if supported {
        println!("webp: supported");
    } else {
        println!("webp: not supported");
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Logging
// =============================================================================

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "thumbflow=debug"
    } else {
        "thumbflow=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
