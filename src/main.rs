use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use oxicord_cache::domain::entities::ImageId;
use oxicord_cache::infrastructure::{
    AppConfig, ChannelDispatcher, CliArgs, Command, HttpImageFetcher, ImageCache, StorageManager,
    circle_clip,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let storage = StorageManager::new()?;
    let mut config = storage
        .load_config(args.config.as_deref())
        .wrap_err("Failed to load configuration")?;
    config.merge_with_args(args);
    Ok(config)
}

async fn run(cache: &ImageCache, command: Command) -> Result<()> {
    match command {
        Command::Size => {
            let dir = cache
                .cache_dir()
                .map_or_else(|| "(memory only)".to_string(), |d| d.display().to_string());
            println!("Directory: {dir}");
            println!("Size:      {} bytes", cache.cache_size().await);
            println!("Budget:    {} bytes", cache.max_cache_size());
        }
        Command::Check => {
            if cache.check_and_purge().await {
                println!("Cache was over budget and has been purged");
            } else {
                println!("Cache is within budget");
            }
        }
        Command::Purge => {
            cache.purge().await;
            println!("Cache purged");
        }
        Command::Fetch {
            url,
            id,
            circle,
            output,
        } => {
            let id = id.map_or_else(|| ImageId::from_url(&url), ImageId::new);
            let loaded = cache
                .load(&id, &url)
                .await
                .ok_or_else(|| eyre!("Failed to load image from {url}"))?;

            let image = if circle {
                Arc::new(circle_clip(&loaded.image))
            } else {
                loaded.image
            };
            println!(
                "{id}: {}x{} from {}",
                image.width(),
                image.height(),
                loaded.source
            );

            if let Some(output) = output {
                save_png(image, &output).await?;
                println!("Saved to {}", output.display());
            }
        }
    }
    Ok(())
}

async fn save_png(image: Arc<image::DynamicImage>, path: &Path) -> Result<()> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        image
            .save_with_format(&path, image::ImageFormat::Png)
            .wrap_err_with(|| format!("Failed to write {}", path.display()))
    })
    .await?
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = oxicord_cache::VERSION, "Starting {}", oxicord_cache::NAME);

    let fetcher = Arc::new(HttpImageFetcher::new(config.cache.fetch_timeout())?);
    // Nothing renders here, so queued callbacks are dropped with the receiver.
    let (dispatcher, _ui_jobs) = ChannelDispatcher::new();
    let cache = ImageCache::start(
        config.cache.image_cache_config(),
        fetcher,
        Arc::new(dispatcher),
    )
    .await;

    let result = run(&cache, args.command).await;

    cache.shutdown().await;

    result
}
