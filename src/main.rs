use clap::builder::PossibleValuesParser;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use mermaid_mcp::cli::server::ServeArgs;
use mermaid_mcp::{DiagramKind, FileType, Result, ServerConfig};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mermaid-mcp")]
#[command(author = "Chris Cheng <chris.cheng@shopee.com>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server that turns text and files into Mermaid diagrams", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to config.toml (default: <config dir>/mermaid-mcp/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server over HTTP
    Serve(ServeArgs),

    /// Run the MCP server over stdin/stdout
    Stdio {
        /// Serve templates from this directory instead of the bundled copies
        #[arg(long)]
        templates_dir: Option<PathBuf>,
    },

    /// Generate a diagram from a text description
    Generate {
        /// Description of the diagram
        text: String,

        /// Diagram type (detected from the text when omitted)
        #[arg(
            short = 't',
            long = "type",
            value_parser = PossibleValuesParser::new(DiagramKind::names())
        )]
        diagram_type: Option<String>,

        /// Print the full structured result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a CSV, JSON or text file into a diagram
    Parse {
        /// File to convert
        path: PathBuf,

        /// File type (inferred from the extension when omitted)
        #[arg(
            short = 't',
            long = "type",
            value_parser = PossibleValuesParser::new(FileType::names())
        )]
        file_type: Option<String>,

        /// Print the full structured result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    mermaid_mcp::cli::init_logging(cli.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

async fn run_async(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve(args) => {
            let config = ServerConfig::load(cli.config.as_deref())?;
            mermaid_mcp::cli::server::run_http(config, &args).await?;
        }
        Commands::Stdio { templates_dir } => {
            let config = ServerConfig::load(cli.config.as_deref())?;
            mermaid_mcp::cli::server::run_stdio(config, templates_dir).await?;
        }
        Commands::Generate {
            text,
            diagram_type,
            json,
        } => {
            mermaid_mcp::cli::generate::run_generate(&text, diagram_type.as_deref(), json)?;
        }
        Commands::Parse {
            path,
            file_type,
            json,
        } => {
            mermaid_mcp::cli::generate::run_parse(&path, file_type.as_deref(), json)?;
        }
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "mermaid-mcp", &mut io::stdout());
        }
    }

    Ok(())
}
