use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use haste_core::{chunk_plan, Credentials};
use haste_observability::{init_tracing, UploadMetrics};
use haste_uploader::{Uploader, UploaderConfig};

#[derive(Debug, Parser)]
#[command(name = "hastebin")]
#[command(about = "Hastebin client: uploads text, splitting large content into linked documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload content and print the link of the last document.
    Upload {
        /// Base URL of the paste server, e.g. https://paste.example.com
        #[arg(long, env = "HASTE_SERVER")]
        server: String,

        #[command(flatten)]
        input: InputArgs,

        #[arg(long, env = "HASTE_USERNAME", requires = "password")]
        username: Option<String>,

        #[arg(long, env = "HASTE_PASSWORD", requires = "username", hide_env_values = true)]
        password: Option<String>,
    },
    /// Show how content would be split, without uploading.
    Plan {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long)]
        max_chunk_chars: Option<usize>,
    },
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Text to upload. Read from --file or stdin when omitted.
    #[arg(conflicts_with = "file")]
    data: Option<String>,

    #[arg(long)]
    file: Option<PathBuf>,
}

impl InputArgs {
    fn read(self) -> Result<String> {
        if let Some(data) = self.data {
            return Ok(data);
        }

        if let Some(path) = self.file {
            return fs::read_to_string(&path)
                .with_context(|| format!("failed reading {}", path.display()));
        }

        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed reading stdin")?;
        Ok(buffer)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("hastebin");
    let cli = Cli::parse();

    match cli.command {
        Command::Upload {
            server,
            input,
            username,
            password,
        } => {
            let content = input.read()?;
            let credentials = Credentials::from_pair(username, password);

            let uploader = Uploader::new(UploaderConfig::from_env(), UploadMetrics::shared())
                .context("failed to set up uploader")?;
            let result = uploader
                .upload(&content, &server, credentials.as_ref())
                .await
                .with_context(|| format!("upload to {server} failed"))?;

            tracing::info!(
                chunks = result.chunk_count,
                metrics = %serde_json::to_string(&uploader.metrics().snapshot())?,
                "upload finished"
            );
            println!("{}", result.link);
        }
        Command::Plan {
            input,
            max_chunk_chars,
        } => {
            let content = input.read()?;
            let max_chunk_chars =
                max_chunk_chars.unwrap_or_else(|| UploaderConfig::from_env().max_chunk_chars);
            let plan = chunk_plan(&content, max_chunk_chars);
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
    }

    Ok(())
}
