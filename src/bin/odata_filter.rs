//! Command-line inspector for OData `$filter` and `$orderby` expressions
//!
//! Parses an expression, optionally against an entity type of a JSON
//! schema, and prints the normalized expression with its resolved type or
//! the diagnostic for the first error.

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use odata_filter::analyzer::ResourceContext;
use odata_filter::diagnostics::{DiagnosticFormatter, Format};
use odata_filter::model::types::type_display;
use odata_filter::{FilterParser, ParseError, ParserConfig, Schema};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "odata-filter")]
#[command(about = "Parse and type-check OData v2 $filter and $orderby expressions")]
#[command(version)]
#[command(author = "OctoFHIR Team <funyloony@gmail.com>")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a $filter expression
    Filter {
        #[command(flatten)]
        args: CommonArgs,
        /// Accept expressions whose type is not Edm.Boolean
        #[arg(long)]
        allow_non_boolean: bool,
    },
    /// Parse an $orderby expression
    Orderby {
        #[command(flatten)]
        args: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Expression to parse
    expression: String,
    /// JSON schema document with the entity types
    #[arg(short, long)]
    schema: Option<PathBuf>,
    /// Entity type the expression applies to (requires --schema)
    #[arg(short, long, requires = "schema")]
    entity_type: Option<String>,
    /// Disable numeric type promotion
    #[arg(long)]
    no_promotion: bool,
    /// Print the expression tree
    #[arg(long)]
    tree: bool,
    /// Diagnostic output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Compact,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Format::Text,
            OutputFormat::Compact => Format::Compact,
            OutputFormat::Json => Format::Json,
        }
    }
}

fn main() {
    human_panic::setup_panic!();
    env_logger::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            process::exit(2);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let (args, require_boolean, is_filter) = match cli.command {
        Commands::Filter {
            args,
            allow_non_boolean,
        } => (args, !allow_non_boolean, true),
        Commands::Orderby { args } => (args, false, false),
    };

    let schema = args.schema.as_deref().map(load_schema).transpose()?;
    let config = ParserConfig::new(require_boolean, !args.no_promotion);

    let parser = match (&schema, &args.entity_type) {
        (Some(schema), Some(name)) => {
            let entity_type = schema
                .resolve_entity_type(name)
                .ok_or_else(|| anyhow!("entity type '{name}' not found in schema"))?;
            FilterParser::with_resource(ResourceContext::new(schema, entity_type))
        }
        (Some(_), None) => bail!("--schema requires --entity-type"),
        _ => FilterParser::new(),
    }
    .with_config(config);

    let outcome = if is_filter {
        print_filter(&parser, &args)
    } else {
        print_order_by(&parser, &args)
    };

    match outcome {
        Ok(()) => Ok(0),
        Err(err) => {
            let formatter = DiagnosticFormatter::new(args.format.into());
            eprintln!("{}", formatter.format(&err.to_diagnostic()));
            Ok(1)
        }
    }
}

fn load_schema(path: &Path) -> Result<Schema> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading schema '{}'", path.display()))?;
    let schema = Schema::from_json(&text)
        .with_context(|| format!("loading schema '{}'", path.display()))?;
    log::info!("loaded schema namespace '{}'", schema.namespace());
    Ok(schema)
}

fn print_filter(parser: &FilterParser<'_>, args: &CommonArgs) -> Result<(), ParseError> {
    let filter = parser.parse_filter(&args.expression)?;
    match &filter.root {
        Some(root) => {
            println!("expression: {}", root.to_uri());
            println!("type: {}", type_display(root.edm_type()));
            if args.tree {
                println!("{root:#?}");
            }
        }
        None => println!("expression: <empty>"),
    }
    Ok(())
}

fn print_order_by(parser: &FilterParser<'_>, args: &CommonArgs) -> Result<(), ParseError> {
    let order_by = parser.parse_order_by(&args.expression)?;
    if order_by.orders.is_empty() {
        println!("expression: <empty>");
    }
    for (index, order) in order_by.orders.iter().enumerate() {
        println!(
            "{}. {} {} : {}",
            index + 1,
            order.expression.to_uri(),
            order.sort_order,
            type_display(order.expression.edm_type())
        );
        if args.tree {
            println!("{:#?}", order.expression);
        }
    }
    Ok(())
}
