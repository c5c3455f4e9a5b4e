//! Stripe Cast CLI
//!
//! Command-line interface for casting request bodies and materializing
//! responses.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use stripe_cast::{
    cast, materialize, ClientConfig, HttpTransport, Method, Object, Operation, Schema,
    SchemaLoadError, Transport,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stripe-cast")]
#[command(about = "Cast Stripe request bodies and materialize responses")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a change map down to the fields a schema permits
    Cast {
        /// Input file holding the change map
        input: PathBuf,

        /// Schema declaration file
        #[arg(long)]
        schema: PathBuf,

        /// Operation to cast for (create, update, retrieve)
        #[arg(long, short)]
        op: String,

        /// Composite field that may be cleared with null on update (repeatable)
        #[arg(long)]
        nullable: Vec<String>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Materialize a response payload and report its kind
    Materialize {
        /// Response payload file
        payload: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Retrieve a resource from the API and materialize it
    Get {
        /// Path relative to the API base (e.g. customers/cus_123)
        path: String,

        /// Config file (STRIPE_* environment variables if not specified)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Cast {
            input,
            schema,
            op,
            nullable,
            output,
            pretty,
        } => run_cast(&input, &schema, &op, &nullable, output, pretty),

        Commands::Materialize { payload, pretty } => run_materialize(&payload, pretty),

        Commands::Get {
            path,
            config,
            pretty,
        } => run_get(&path, config.as_deref(), pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_cast(
    input_path: &Path,
    schema_path: &Path,
    op: &str,
    nullable: &[String],
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let Some(operation) = Operation::parse(op) else {
        eprintln!(
            "Error: unknown operation \"{}\": expected create, update, or retrieve",
            op
        );
        return Err(2);
    };

    let schema = Schema::load(schema_path).map_err(|e| {
        eprintln!("Error loading schema: {}", e);
        if let SchemaLoadError::InvalidDeclaration { errors } = &e {
            for error in errors {
                eprintln!("  {}", error);
            }
        }
        e.exit_code() as u8
    })?;

    let input = load_json(input_path)?;
    let Some(changes) = input.as_object() else {
        eprintln!("Error: input must be a JSON object");
        return Err(2);
    };

    let nullable: Vec<&str> = nullable.iter().map(String::as_str).collect();
    let body = cast(changes, &schema, operation, &nullable);

    let json_output = render(&Value::Object(body), pretty)?;
    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_materialize(payload_path: &Path, pretty: bool) -> Result<(), u8> {
    let payload = load_json(payload_path)?;
    let object = materialize(&payload);
    println!("{}", render(&describe(&object), pretty)?);
    Ok(())
}

fn run_get(path: &str, config_path: Option<&Path>, pretty: bool) -> Result<(), u8> {
    let config = match config_path {
        Some(p) => ClientConfig::load(p),
        None => ClientConfig::from_env(),
    }
    .map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let transport = HttpTransport::from_config(&config).map_err(|e| {
        eprintln!("Error: {}", e);
        3u8
    })?;

    // No expected kind here, so responses are materialized by discriminator alone
    let response = transport.request(
        Method::Get,
        path,
        &Map::new(),
        &Map::new(),
        &config.request_options(),
    );
    let object = match response {
        Ok(payload) => materialize(&payload),
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(status) = e.status {
                eprintln!("  status: {}", status);
            }
            return Err(1);
        }
    };

    println!("{}", render(&describe(&object), pretty)?);
    Ok(())
}

/// Summarize a materialized value as `{ "kind": ..., "value": ... }`.
fn describe(object: &Object) -> Value {
    let kind = match object {
        Object::Resource(resource) => resource.kind().discriminator(),
        Object::Map(_) => "mapping",
        Object::List(_) => "sequence",
        _ => "scalar",
    };
    json!({ "kind": kind, "value": object.to_value() })
}

fn load_json(path: &Path) -> Result<Value, u8> {
    if !path.exists() {
        eprintln!("Error: file not found: {}", path.display());
        return Err(3);
    }
    let content = std::fs::read_to_string(path).map_err(|e| {
        eprintln!("Error: cannot read {}: {}", path.display(), e);
        3u8
    })?;
    serde_json::from_str(&content).map_err(|e| {
        eprintln!("Error: invalid JSON in {}: {}", path.display(), e);
        2u8
    })
}

fn render(value: &Value, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}
