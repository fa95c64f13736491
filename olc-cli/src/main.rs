//! olcconf: inspect and prepare OpenLDAP `cn=config` data
//!
//! Usage:
//!   olcconf acl rules.txt
//!   olcconf schema /etc/openldap/schema/cosine.schema
//!   olcconf diff old.json new.json
//!   olcconf init databases.json --schema core.schema > config.ldif
//!   olcconf index "uid eq,sub" "cn pres"
//!
//! Results go to stdout, diagnostics to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "olcconf")]
#[command(about = "Inspect and prepare OpenLDAP cn=config data")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print access rules (one per line) in canonical form
    Acl {
        /// Rule file, `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Convert a .schema file into a schema entry (JSON)
    Schema {
        /// Schema file; its name without `.schema` names the entry
        file: PathBuf,
    },

    /// List the modifications that turn one JSON entry into another
    Diff { old: PathBuf, new: PathBuf },

    /// Print the LDIF of a fresh configuration
    Init {
        /// JSON list of databases, the first one being the frontend
        databases: PathBuf,

        /// Schema files to include, in order
        #[arg(short, long = "schema")]
        schema: Vec<PathBuf>,

        /// Leave out the cn=config entry
        #[arg(long)]
        no_globals: bool,
    },

    /// Decode olcDbIndex values
    Index {
        #[arg(required = true)]
        values: Vec<String>,
    },
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    debug!("running {:?}", args.command);
    let output = match &args.command {
        Command::Acl { input } => olcconf::normalize_acl(&read_input(input)?)?,
        Command::Schema { file } => olcconf::schema_to_json(file)?,
        Command::Diff { old, new } => olcconf::diff_json(&read_input(old)?, &read_input(new)?)?,
        Command::Init {
            databases,
            schema,
            no_globals,
        } => olcconf::init_ldif(&read_input(databases)?, schema, !no_globals)?,
        Command::Index { values } => olcconf::decode_indexes(values.iter().map(String::as_str)),
    };
    print!("{output}");
    Ok(())
}
