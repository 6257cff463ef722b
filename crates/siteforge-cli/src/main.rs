//! SiteForge CLI
//!
//! The `siteforge` command drives the build pipeline from a prompt.
//!
//! ## Commands
//!
//! - `build`: run the full pipeline against a business description
//! - `show`: inspect a persisted bundle

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use siteforge_core::{
    init_tracing, AiProvider, BuildContext, BuildMode, BuildPipeline, BuildPipelineState,
    HostedProvider, LogFormat, StageStatus, TemplateProvider,
};
use siteforge_store::fakes::MemorySiteStore;
use siteforge_store::{SiteStore, SurrealSiteStore};

#[derive(Parser)]
#[command(name = "siteforge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Staged build pipeline for AI-generated sites", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the build pipeline against a business description
    Build {
        /// Natural-language business description
        #[arg(short, long)]
        prompt: String,

        /// Business entity id
        #[arg(short, long, default_value = "biz-local")]
        business: String,

        /// Owner id
        #[arg(short, long, default_value = "owner-local")]
        owner: String,

        /// Build mode: "template" or "systems_ai"
        #[arg(short, long, default_value = "template")]
        mode: String,

        /// Industry hint (e.g. "restaurant")
        #[arg(short, long)]
        industry: Option<String>,

        /// Override the free-tier page limit
        #[arg(long)]
        pages_max: Option<u32>,

        /// Storage backend: "memory" or "surreal"
        #[arg(long, default_value = "memory")]
        store: String,
    },

    /// Inspect a persisted bundle
    Show {
        /// Site id
        #[arg(short, long)]
        site: String,

        /// Exact build id (default: latest bundle for the site)
        #[arg(short, long)]
        build: Option<String>,

        /// Print the full bundle JSON
        #[arg(long)]
        full: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let format = if cli.json { LogFormat::Json } else { LogFormat::Text };
    init_tracing(format, level);

    match cli.command {
        Commands::Build {
            prompt,
            business,
            owner,
            mode,
            industry,
            pages_max,
            store,
        } => run_build(prompt, business, owner, mode, industry, pages_max, store).await,
        Commands::Show { site, build, full } => run_show(site, build, full).await,
    }
}

async fn run_build(
    prompt: String,
    business: String,
    owner: String,
    mode: String,
    industry: Option<String>,
    pages_max: Option<u32>,
    store_kind: String,
) -> Result<()> {
    let mode = BuildMode::from_str(&mode).map_err(|e| anyhow::anyhow!(e))?;

    let store: Arc<dyn SiteStore> = match store_kind.as_str() {
        "memory" => Arc::new(MemorySiteStore::new()),
        "surreal" => Arc::new(
            SurrealSiteStore::from_env()
                .await
                .context("failed to open surreal store")?,
        ),
        other => anyhow::bail!("unknown store backend: {other}"),
    };

    let provider: Arc<dyn AiProvider> = match mode {
        BuildMode::Template => Arc::new(TemplateProvider::new()),
        BuildMode::SystemsAi => Arc::new(HostedProvider::from_env()),
    };

    let mut ctx = BuildContext::new(prompt, business, owner, mode);
    if let Some(industry) = industry {
        ctx = ctx.with_industry(industry);
    }
    if let Some(pages_max) = pages_max {
        ctx = ctx.with_constraint("pages_max", serde_json::json!(pages_max));
    }

    let pipeline = BuildPipeline::new(store, provider);
    match pipeline.execute(ctx).await {
        Ok(state) => {
            print_summary(&state);
            Ok(())
        }
        Err(failure) => {
            print_summary(&failure.state);
            Err(anyhow::anyhow!(
                "build {} failed at stage {}: {}",
                failure.build_id,
                failure.stage,
                failure.error
            ))
        }
    }
}

fn print_summary(state: &BuildPipelineState) {
    println!("build:  {}", state.build_id);
    println!("site:   {}", state.site_id);
    println!("mode:   {}", state.mode);
    println!();
    println!("stages:");
    for (stage, result) in &state.stages {
        let marker = match result.status {
            StageStatus::Completed => "ok",
            StageStatus::Skipped => "--",
            StageStatus::Failed => "XX",
            StageStatus::Running => "..",
            StageStatus::Pending => "  ",
        };
        match &result.error {
            Some(err) => println!("  [{marker}] {:<13} {}", stage.name(), err.message),
            None => println!("  [{marker}] {}", stage.name()),
        }
    }
    println!();
    println!("routes:");
    for route in &state.bundle.manifest.routes {
        println!("  {:<18} {}", route.path, route.title);
    }
    println!();
    println!("brand:       {}", state.bundle.brand.name);
    println!("bindings:    {}", state.bundle.intents.bindings.len());
    println!("automations: {}", state.bundle.automations.installed.len());
    if !state.bundle.build.warnings.is_empty() {
        println!();
        println!("warnings:");
        for warning in &state.bundle.build.warnings {
            println!("  - {warning}");
        }
    }
}

async fn run_show(site: String, build: Option<String>, full: bool) -> Result<()> {
    let store = SurrealSiteStore::from_env()
        .await
        .context("failed to open surreal store")?;

    let bundle = match build {
        Some(build_id) => store.get_bundle(&site, &build_id).await?,
        None => store.get_latest_bundle(&site).await?,
    };

    if full {
        println!("{}", serde_json::to_string_pretty(&bundle.bundle_json)?);
        return Ok(());
    }

    println!("site:    {}", bundle.site_id);
    println!("build:   {}", bundle.build_id);
    println!("version: {}", bundle.version);
    println!("saved:   {}", bundle.created_at);

    if let Some(routes) = bundle.bundle_json["manifest"]["routes"].as_array() {
        println!();
        println!("routes:");
        for route in routes {
            println!(
                "  {:<18} {}",
                route["path"].as_str().unwrap_or("?"),
                route["title"].as_str().unwrap_or("?")
            );
        }
    }
    if let Some(bindings) = bundle.bundle_json["intents"]["bindings"].as_array() {
        println!();
        println!("bindings: {}", bindings.len());
    }
    if let Some(installed) = bundle.bundle_json["automations"]["installed"].as_array() {
        println!("automations: {}", installed.len());
    }
    Ok(())
}
