//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, VideoCommands};
use crate::config::ClientSettings;
use crate::error::{Error, Result};
use crate::http::RestClient;
use crate::models::{VideoListParams, VideoUpdate};
use crate::pagination::Page;
use serde::Serialize;
use serde_json::json;
use std::io::{self, Write};
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command against the configured API, printing to stdout
    pub async fn run(&self) -> Result<()> {
        let client = self.settings()?.build_client()?;
        debug!("Using endpoint {}", client.endpoint());
        self.execute(&client, &mut io::stdout()).await
    }

    /// Settings from the `--config` file (if any) with environment overrides
    pub fn settings(&self) -> Result<ClientSettings> {
        let settings = match &self.cli.config {
            Some(path) => ClientSettings::load(path)?,
            None => ClientSettings::default(),
        };
        Ok(settings.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Run the CLI command with an existing client, writing results to `out`
    pub async fn execute<W: Write + Send>(&self, client: &RestClient, out: &mut W) -> Result<()> {
        match &self.cli.command {
            Commands::Videos { command } => match command {
                VideoCommands::List {
                    page,
                    per_page,
                    query,
                    all,
                    limit,
                } => {
                    let mut params = VideoListParams::new();
                    params.page = *page;
                    params.per_page = *per_page;
                    params.q.clone_from(query);
                    self.list_videos(client, &params, *all, *limit, out).await
                }
                VideoCommands::Get { id } => {
                    let video = client.video(*id).await?;
                    self.output(out, &video)
                }
                VideoCommands::Update {
                    id,
                    title,
                    description,
                    private,
                } => {
                    let update = VideoUpdate {
                        title: title.clone(),
                        description: description.clone(),
                        is_private: *private,
                        ..Default::default()
                    };
                    if update.is_empty() {
                        return Err(Error::config(
                            "Nothing to update (use --title, --description or --private)",
                        ));
                    }
                    let video = client.update_video(*id, &update).await?;
                    self.output(out, &video)
                }
                VideoCommands::Delete { id } => {
                    client.delete_video(*id).await?;
                    info!("Deleted video {id}");
                    self.output(out, &json!({"deleted": id}))
                }
            },
            Commands::RateLimit => self.rate_limit(client, out).await,
        }
    }

    /// List one page, or walk every page lazily when `all` is set
    async fn list_videos<W: Write + Send>(
        &self,
        client: &RestClient,
        params: &VideoListParams,
        all: bool,
        limit: Option<usize>,
        out: &mut W,
    ) -> Result<()> {
        let first = client.list_videos(params).await?;
        let total = first.total_count();
        let limit = limit.unwrap_or(usize::MAX);

        if !all {
            for video in first.items().iter().take(limit) {
                self.output(out, video)?;
            }
            return Ok(());
        }

        let mut cursor = first.iter_lazy();
        let mut emitted = 0;
        while emitted < limit {
            match cursor.advance().await {
                Some(video) => {
                    self.output(out, &video?)?;
                    emitted += 1;
                }
                None => break,
            }
        }

        info!(
            "Listed {} of {} videos across {} pages",
            emitted,
            total,
            cursor.pages_fetched()
        );
        Ok(())
    }

    /// Issue a minimal request and report the quota headers it carried
    async fn rate_limit<W: Write + Send>(&self, client: &RestClient, out: &mut W) -> Result<()> {
        client
            .list_videos(&VideoListParams::new().per_page(1))
            .await?;

        match client.last_rate_limit().await {
            Some(status) => self.output(out, &status),
            None => self.output(out, &json!({"limit": null, "remaining": null})),
        }
    }

    /// Write a value in the selected format
    fn output<W: Write, T: Serialize + ?Sized>(&self, out: &mut W, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        writeln!(out, "{text}")?;
        Ok(())
    }
}
