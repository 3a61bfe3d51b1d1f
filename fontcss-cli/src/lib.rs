//! fontcss CLI (fontcss https://github.com/fontcss/fontcss)

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use fontcss_core::css::CssEngine;
use fontcss_core::face::{GeneratorConfig, RenderOptions, UrlLayout};
use fontcss_core::output::{write_css, write_rules_json_pretty, write_rules_ndjson};
use fontcss_core::registry::{parse_alias, FamilyAliases, FamilyRegistry};
use fontcss_core::specifier::ParseMode;
use fontcss_core::subsets::SubsetCatalog;

pub mod server;

/// Environment variable consulted when `--domain` is not given.
pub const DOMAIN_ENV: &str = "FONTCSS_DOMAIN";

/// CLI entrypoint for fontcss.
#[derive(Debug, Parser)]
#[command(
    name = "fontcss",
    about = "Self-hosted web font CSS API (css2 family specifiers → @font-face)"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve /css2, /css and /icon over HTTP
    Serve(ServeArgs),
    /// Render CSS for family specifiers to stdout
    Css(CssArgs),
}

#[derive(Debug, Args)]
struct EngineArgs {
    /// JSON object mapping subset names to unicode-range strings
    #[arg(long = "subsets", default_value = "subsets.json", value_hint = ValueHint::FilePath)]
    subsets: PathBuf,

    /// JSON font list (`[{"id": ..., "subsets": [...]}]`)
    #[arg(long = "registry", value_hint = ValueHint::FilePath)]
    registry: Option<PathBuf>,

    /// Host serving the WOFF2 binaries (falls back to FONTCSS_DOMAIN, then localhost)
    #[arg(long = "domain", value_hint = ValueHint::Hostname)]
    domain: Option<String>,

    /// Reject malformed specifiers instead of falling back to defaults
    #[arg(long = "strict", action = ArgAction::SetTrue)]
    strict: bool,

    /// Binary naming on the CDN (shared|per-subset)
    #[arg(long = "url-layout", default_value_t = UrlLayoutArg::Shared, value_enum)]
    url_layout: UrlLayoutArg,

    /// Extra family id aliases (old-id=new-id)
    #[arg(long = "alias", value_hint = ValueHint::Other)]
    aliases: Vec<String>,

    /// Subsets to serve for families missing from the registry
    #[arg(long = "fallback-subsets", value_delimiter = ',', value_hint = ValueHint::Other)]
    fallback_subsets: Vec<String>,
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long = "bind", default_value = "0.0.0.0:3000")]
    bind: String,

    /// Where `/` redirects to
    #[arg(long = "homepage", value_hint = ValueHint::Url)]
    homepage: Option<String>,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Debug, Args)]
struct CssArgs {
    /// Family specifiers (e.g. "Roboto:ital,wght@0,400;1,700"); `|` separates several
    #[arg(required = true, value_hint = ValueHint::Other)]
    families: Vec<String>,

    /// font-display value (auto|block|swap|fallback|optional)
    #[arg(short = 'd', long = "display")]
    display: Option<String>,

    /// Text the fonts will be used for
    #[arg(short = 't', long = "text")]
    text: Option<String>,

    /// Emit the rules as a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit the rules as newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum UrlLayoutArg {
    Shared,
    PerSubset,
}

impl From<UrlLayoutArg> for UrlLayout {
    fn from(arg: UrlLayoutArg) -> Self {
        match arg {
            UrlLayoutArg::Shared => UrlLayout::SharedBinary,
            UrlLayoutArg::PerSubset => UrlLayout::PerSubset,
        }
    }
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => run_serve(args),
        Command::Css(args) => run_css(args),
    }
}

fn run_serve(args: ServeArgs) -> Result<()> {
    let engine = build_engine(&args.engine)?;
    let state = server::AppState::new(Arc::new(engine), args.homepage);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting tokio runtime")?;
    runtime.block_on(server::serve(&args.bind, state))
}

fn run_css(args: CssArgs) -> Result<()> {
    let engine = build_engine(&args.engine)?;
    let stdout = io::stdout();
    let handle = stdout.lock();
    render_css(&args, &engine, handle)
}

fn render_css(args: &CssArgs, engine: &CssEngine, mut w: impl Write) -> Result<()> {
    let opts = RenderOptions::from_query(args.display.as_deref(), args.text.as_deref(), engine.mode())?;

    if args.json || args.ndjson {
        let rules = engine.rules(&args.families, &opts)?;
        if args.ndjson {
            write_rules_ndjson(&rules, &mut w)?;
        } else {
            write_rules_json_pretty(&rules, &mut w)?;
        }
        return Ok(());
    }

    let response = engine.generate_css(&args.families, &opts)?;
    if !response.is_css() {
        return Err(anyhow!("{}", response.body));
    }
    write_css(&response, &mut w)
}

fn build_engine(args: &EngineArgs) -> Result<CssEngine> {
    let catalog = SubsetCatalog::load(&args.subsets)?;

    let mut aliases = FamilyAliases::default();
    for raw in &args.aliases {
        let (from, to) = parse_alias(raw)?;
        aliases.insert(from, to);
    }

    let registry = match &args.registry {
        Some(path) => FamilyRegistry::load(path)?,
        None => FamilyRegistry::new(),
    }
    .with_aliases(aliases)
    .with_fallback_subsets(Some(args.fallback_subsets.clone()));

    if registry.is_empty() && args.fallback_subsets.is_empty() {
        log::warn!("no registry and no fallback subsets: every family will be reported as unavailable");
    }

    let config = GeneratorConfig {
        domain: resolve_domain(&args.domain),
        url_layout: args.url_layout.into(),
    };
    let mode = if args.strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };

    let engine = CssEngine::new(catalog, registry, config).with_mode(mode);
    log::info!(
        "loaded {} subsets and {} families, serving binaries from {}",
        engine.catalog().len(),
        engine.registry().len(),
        engine.config().domain
    );
    Ok(engine)
}

fn resolve_domain(arg: &Option<String>) -> String {
    let raw = match arg {
        Some(domain) => domain.clone(),
        None => env::var(DOMAIN_ENV).unwrap_or_default(),
    };
    let trimmed = raw
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');

    if trimmed.is_empty() {
        "localhost".to_string()
    } else {
        trimmed.to_string()
    }
}
