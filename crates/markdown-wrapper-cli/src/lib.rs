use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};
use markdown_wrapper::{AttributeValue, Node, Root, Wrapper, WrapperOptions};
use markdown_wrapper_config::{Config, LoadOptions};
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(
    name = "markdown-wrapper",
    author,
    version,
    about = "Wrap the top-level content of a HAST JSON tree in one container element"
)]
pub struct Cli {
    /// HAST JSON document to read; `-` or omitted reads stdin
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Write the wrapped tree here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Configuration file taking precedence over discovered ones
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Tag name of the wrapper element
    #[arg(long, value_name = "NAME")]
    pub tag_name: Option<String>,

    /// Value of the wrapper's class property
    #[arg(long, value_name = "NAME")]
    pub class_name: Option<String>,

    /// Extra wrapper attribute; repeat for more
    #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_attribute)]
    pub attributes: Vec<(String, AttributeValue)>,

    /// Indent the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Options given on the command line, to be layered over configuration.
    pub fn wrapper_overrides(&self) -> WrapperOptions {
        let mut options = WrapperOptions {
            tag_name: self.tag_name.clone(),
            class_name: self.class_name.clone(),
            attributes: None,
        };
        for (key, value) in &self.attributes {
            options = options.with_attribute(key.clone(), value.clone());
        }
        options
    }
}

/// Reads, wraps and writes one tree.
pub fn run(cli: &Cli) -> Result<()> {
    let mut load = LoadOptions::default();
    if let Some(path) = &cli.config {
        load = load.with_override_path(path);
    }
    let config = Config::load(load)?;

    let mut options = config.wrapper_options();
    options.merge(cli.wrapper_overrides());
    let wrapper = Wrapper::new(options);
    info!(
        tag_name = wrapper.tag_name(),
        class_name = wrapper.class_name();
        "Wrapper configured"
    );

    let input = read_input(cli.input.as_deref())?;
    let root = decode_root(&input)?;
    debug!(children = root.children.len(); "Decoded tree");

    let tree = wrapper.transform(root);
    let rendered = encode(&Node::Root(tree), cli.pretty)?;
    write_output(cli.output.as_deref(), &rendered)
}

fn parse_attribute(raw: &str) -> Result<(String, AttributeValue), String> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(format!("expected KEY=VALUE, got '{raw}'"));
    };
    Ok((key.to_string(), AttributeValue::parse_loose(value)))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read input {}", path.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn decode_root(input: &str) -> Result<Root> {
    let node: Node = serde_json::from_str(input).context("failed to decode HAST JSON")?;
    match node {
        Node::Root(root) => Ok(root),
        Node::Other(value) if value.get("type").and_then(Value::as_str) == Some("root") => {
            serde_json::from_value(value).context("malformed root node")
        }
        other => bail!("expected a root node, found '{}'", other.type_name()),
    }
}

fn encode(node: &Node, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(node)
    } else {
        serde_json::to_string(node)
    };
    rendered.context("failed to encode tree")
}

fn write_output(path: Option<&Path>, rendered: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, format!("{rendered}\n"))
            .with_context(|| format!("failed to write output {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{rendered}").context("failed to write stdout")
        }
    }
}
