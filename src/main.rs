use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use yaxi::config::{Config, OutputFormat};
use yaxi::document::node::XmlNode;
use yaxi::file::loader::{load_xml_file, load_xml_from_stdin};
use yaxi::query::{parse_query, Matched, StoredQuery};

/// yaxi - terse attribute-filter queries over XML documents
#[derive(Parser)]
#[command(name = "yaxi")]
#[command(version)]
#[command(about = "Terse attribute-filter queries over XML documents", long_about = None)]
struct Cli {
    /// XML file to query (.gz and portable .json accepted; omit to read stdin)
    file: Option<String>,

    /// Query to try, e.g. 'What/Param[name=FAR]/0'; repeat to try several, first match wins
    #[arg(short, long = "query")]
    queries: Vec<String>,

    /// Print this attribute of the matched node
    #[arg(short, long, conflicts_with = "text")]
    attr: Option<String>,

    /// Print the text of the matched node
    #[arg(short, long)]
    text: bool,

    /// Output format: text or json (default from config)
    #[arg(short, long)]
    format: Option<String>,

    /// Print the whole document in portable JSON form and exit
    #[arg(long)]
    portable: bool,

    /// Keep whitespace around element text
    #[arg(long)]
    no_trim: bool,
}

/// Installs the global subscriber; `RUST_LOG` wins over the config filter.
fn init_logging(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load();
    if cli.no_trim {
        config.trim_text = false;
    }
    if let Some(format) = &cli.format {
        config.output_format = match format.as_str() {
            "text" => OutputFormat::Text,
            "json" => OutputFormat::Json,
            other => bail!("Unknown output format '{}': expected text or json", other),
        };
    }
    init_logging(&config);

    let options = config.parse_options();
    let root = if let Some(path) = &cli.file {
        load_xml_file(path, &options).with_context(|| format!("Failed to load {}", path))?
    } else if !io::stdin().is_terminal() {
        load_xml_from_stdin(&options)?
    } else {
        bail!("No input: pass a file or pipe a document on stdin");
    };
    debug!(root = %root.tag(), "document loaded");

    let mut stdout = io::stdout().lock();

    if cli.portable {
        let json = if config.pretty_json {
            root.to_json_pretty()?
        } else {
            root.to_json()?
        };
        writeln!(stdout, "{}", json)?;
        return Ok(());
    }

    let query = build_query(&cli)?;
    let matched = query
        .resolve(&root)
        .with_context(|| format!("Query '{}' failed", query))?;

    match config.output_format {
        OutputFormat::Text => {
            for line in render_text(&matched) {
                writeln!(stdout, "{}", line)?;
            }
        }
        OutputFormat::Json => {
            let value = render_json(&matched)?;
            let json = if config.pretty_json {
                serde_json::to_string_pretty(&value)?
            } else {
                serde_json::to_string(&value)?
            };
            writeln!(stdout, "{}", json)?;
        }
    }

    Ok(())
}

/// Turns the command-line queries and selection into one stored query.
fn build_query(cli: &Cli) -> Result<StoredQuery> {
    let mut query = StoredQuery::new();
    for text in &cli.queries {
        let step = parse_query(text).with_context(|| format!("Invalid query '{}'", text))?;
        query = query.step(step)?;
    }
    if let Some(name) = &cli.attr {
        query = query.attr(name.as_str())?;
    }
    if cli.text {
        query = query.text()?;
    }
    Ok(query)
}

fn describe_node(node: &XmlNode) -> String {
    let mut line = format!("<{}", node.tag());
    for (name, value) in node.attributes() {
        line.push_str(&format!(" {}=\"{}\"", name, value));
    }
    line.push('>');
    if let Some(text) = node.text() {
        line.push_str(text);
    }
    line
}

fn render_text(matched: &Matched<'_>) -> Vec<String> {
    match matched {
        Matched::Node(node) => vec![describe_node(node)],
        Matched::Nodes(nodes) => nodes.iter().map(|node| describe_node(node)).collect(),
        Matched::Text(Some(text)) => vec![text.to_string()],
        Matched::Text(None) => vec![],
    }
}

fn render_json(matched: &Matched<'_>) -> Result<serde_json::Value> {
    Ok(match matched {
        Matched::Node(node) => node.to_json_value()?,
        Matched::Nodes(nodes) => serde_json::Value::Array(
            nodes
                .iter()
                .map(|node| node.to_json_value())
                .collect::<yaxi::Result<Vec<_>>>()?,
        ),
        Matched::Text(text) => serde_json::json!(text),
    })
}
