use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};
use crate::install::{absolute_link, archive_file_name, home_dir};
use crate::path::with_segment;
use envkit_archive::{ExtractionOutcome, Extractor};
use envkit_cache::{Resolver, SnapshotStore};
use envkit_config::Config;
use envkit_listing::Links;
use envkit_listing::source::HttpSource;
use envkit_progress::bytes_bar;
use exn::{OptionExt, ResultExt};
use indicatif::{HumanBytes, MultiProgress, ProgressBar};
use reqwest::Client;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

pub async fn run(cli: Cli, progress_bars: MultiProgress) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let client = envkit_fetch::client(&config.http.user_agent).or_raise(|| ErrorKind::Client)?;
    let app = App { config, client, progress_bars, quiet: cli.quiet };
    match cli.command {
        Command::List { refresh } => app.list(refresh).await,
        Command::Install { name, refresh, keep_archive } => app.install(&name, refresh, keep_archive).await,
        Command::Extract { archive, destination } => {
            let destination = destination.unwrap_or_else(|| app.config.install.dir.clone());
            app.extract(&archive, &destination).await.map(|_| ())
        },
    }
}

struct App {
    config: Config,
    client: Client,
    progress_bars: MultiProgress,
    quiet: bool,
}
impl App {
    fn resolver(&self) -> Resolver {
        let source = Arc::new(HttpSource::new(self.client.clone()));
        Resolver::new(source, SnapshotStore::new(&self.config.cache.path)).with_max_age(self.config.cache.max_age())
    }

    fn progress_bar(&self, prefix: &'static str) -> ProgressBar {
        match self.quiet {
            true => ProgressBar::hidden(),
            false => self.progress_bars.add(bytes_bar(prefix)),
        }
    }

    async fn links(&self, refresh: bool) -> Result<Links> {
        let listing = &self.config.listing;
        let resolver = self.resolver();
        let links = match refresh {
            true => resolver.refresh(&listing.url, &listing.filter).await,
            false => resolver.resolve(&listing.url, &listing.filter).await,
        };
        links.map_err(|err| {
            let retryable = err.is_retryable();
            err.raise(ErrorKind::Resolve { retryable })
        })
    }

    async fn list(&self, refresh: bool) -> Result<()> {
        let links = self.links(refresh).await?;
        if links.is_empty() {
            tracing::warn!(filter = %self.config.listing.filter, "No download links matched the filter");
        }
        for (name, link) in &links {
            println!("{name}\n    {link}");
        }
        Ok(())
    }

    async fn install(&self, name: &str, refresh: bool, keep_archive: bool) -> Result<()> {
        let links = self.links(refresh).await?;
        let link = links.get(name).ok_or_raise(|| ErrorKind::UnknownArtifact(name.to_string()))?;
        let url =
            absolute_link(&self.config.listing.url, link).ok_or_raise(|| ErrorKind::InvalidLink(link.to_string()))?;
        let install_dir = &self.config.install.dir;
        let archive = install_dir.join(archive_file_name(&url, name));

        tracing::info!("Downloading {name} from {url}");
        let bar = self.progress_bar("Downloading");
        envkit_fetch::download(&self.client, url.as_str(), &archive, &bar)
            .await
            .map_err(|err| {
                let retryable = err.is_retryable();
                err.raise(ErrorKind::Download { url: url.to_string(), retryable })
            })?;

        let entries = envkit_archive::list_entries(&archive).await.or_raise(|| ErrorKind::Extract(archive.clone()))?;
        self.extract(&archive, install_dir).await?;
        if !keep_archive && let Err(err) = tokio::fs::remove_file(&archive).await {
            tracing::warn!(error = %err, "Unable to remove {}", archive.display());
        }

        let bin = home_dir(install_dir, &entries).join("bin");
        let current = std::env::var("PATH").unwrap_or_default();
        match with_segment(&current, &bin.to_string_lossy()) {
            Some(updated) => {
                tracing::info!("Installed {name}; add {} to your PATH:", bin.display());
                println!("PATH={updated}");
            },
            None => tracing::info!("Installed {name}; {} is already on your PATH", bin.display()),
        }
        Ok(())
    }

    async fn extract(&self, archive: &Path, destination: &Path) -> Result<ExtractionOutcome> {
        let extractor = self
            .config
            .install
            .concurrency
            .and_then(NonZeroUsize::new)
            .map(Extractor::new)
            .unwrap_or_default();
        let bar = self.progress_bar("Extracting");
        tracing::info!("Extracting {} into {}", archive.display(), destination.display());
        let outcome = extractor
            .extract(archive, destination, Arc::new(bar))
            .await
            .or_raise(|| ErrorKind::Extract(archive.to_path_buf()))?;
        for failure in &outcome.failures {
            eprintln!("failed to extract {}: {}", failure.path, *failure.error);
        }
        let outcome = outcome.into_result().or_raise(|| ErrorKind::Extract(archive.to_path_buf()))?;
        tracing::info!(
            entries = outcome.entries,
            "Extracted {} into {}",
            HumanBytes(outcome.extracted_bytes),
            destination.display()
        );
        Ok(outcome)
    }
}
