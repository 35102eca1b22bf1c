use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use logsight::blob::DirBlobStore;
use logsight::completion::{CommandCompleter, Unconfigured};
use logsight::config::Settings;
use logsight::corpus::CorpusStore;
use logsight::qa::{Assistant, QuestionResponse, Reply};
use logsight::report::Report;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

fn init_parallelism() {
    static START: Once = Once::new();
    START.call_once(|| {
        let n = num_cpus::get();
        let _ = rayon::ThreadPoolBuilder::new().num_threads(n).build_global();
    });
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Parser, Debug)]
#[command(name = "logsight", version, about = "Access-log analytics with question answering")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Store a local log file and print its key
    Upload {
        file: PathBuf,
        #[arg(long = "content-type", default_value = "text/plain")]
        content_type: String,
    },
    /// List stored log keys
    List,
    /// Analyze stored logs and print their reports
    Analyze {
        #[arg(required = true)]
        keys: Vec<String>,
        /// Output format: json | text
        #[arg(long = "format", default_value = "json")]
        format: String,
    },
    /// Analyze stored logs, then ask a question about the first one
    Ask {
        #[arg(required = true)]
        keys: Vec<String>,
        #[arg(long = "question", short = 'q')]
        question: String,
    },
}

fn main() -> anyhow::Result<()> {
    init_logging();
    init_parallelism();
    let cli = Cli::parse();

    let blobs = DirBlobStore::open(&cli.settings.blob_dir)
        .with_context(|| format!("opening blob dir {}", cli.settings.blob_dir.display()))?;
    let corpora = CorpusStore::new(cli.settings.eviction_policy());
    let assistant = match cli
        .settings
        .completion_command
        .as_deref()
        .and_then(CommandCompleter::from_command_line)
    {
        Some(cmd) => Assistant::new(blobs, cmd, corpora),
        None => Assistant::new(blobs, Unconfigured, corpora),
    };

    match cli.command {
        Cmd::Upload { file, content_type } => {
            let bytes = std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let key = assistant.upload(&name, &bytes, &content_type)?;
            println!("{key}");
        }
        Cmd::List => {
            for key in assistant.list_sources()? {
                println!("{key}");
            }
        }
        Cmd::Analyze { keys, format } => {
            let reports = analyze_all(&assistant, &keys)?;
            if format == "text" {
                for (key, report) in keys.iter().zip(&reports) {
                    println!("# {key}");
                    print!("{report}");
                }
            } else {
                let out: serde_json::Map<String, serde_json::Value> = keys
                    .iter()
                    .zip(&reports)
                    .map(|(k, r)| -> anyhow::Result<_> { Ok((k.clone(), serde_json::to_value(r)?)) })
                    .collect::<anyhow::Result<_>>()?;
                print_json(&serde_json::Value::Object(out))?;
            }
        }
        Cmd::Ask { keys, question } => {
            analyze_all(&assistant, &keys)?;
            let reply: Reply = assistant.ask(&keys[0], &question).into();
            print_json(&reply.body)?;
            if let QuestionResponse::Error(msg) = reply.body {
                bail!("question failed ({}): {msg}", reply.status);
            }
        }
    }
    Ok(())
}

/// Each source is analyzed independently and in parallel; only the corpus
/// store is shared between them.
fn analyze_all(assistant: &Assistant, keys: &[String]) -> anyhow::Result<Vec<Report>> {
    keys.par_iter()
        .map(|key| {
            assistant
                .analyze_source(key)
                .with_context(|| format!("analyzing {key}"))
        })
        .collect()
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    if atty::is(atty::Stream::Stdout) {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", serde_json::to_string(value)?);
    }
    Ok(())
}
