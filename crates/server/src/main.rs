mod api;
mod cors;
mod http_cache;

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use actix_web::middleware::{from_fn, Logger};
use actix_web::{web, App, HttpServer};
use clap::Parser;

use facedetect_core::cache::infrastructure::memory_cache_store::MemoryCacheStore;
use facedetect_core::detection::infrastructure::cascade_resolver;
use facedetect_core::detection::infrastructure::iou_clusterer::IouDetectionClusterer;
use facedetect_core::detection::infrastructure::pico_cascades::PicoCascades;
use facedetect_core::download::infrastructure::http_downloader::HttpDownloader;
use facedetect_core::pipeline::detect_faces_use_case::DetectFacesUseCase;
use facedetect_core::shared::constants::{
    DEFAULT_DOWNLOAD_TIMEOUT_SECS, DEFAULT_MAX_FILE_SIZE, DEFAULT_PORT,
};

use crate::api::AppState;
use crate::http_cache::HttpCache;

/// Cascades shipped next to the binary during development.
const BUNDLED_CASCADE_DIR: &str = "cascades";

/// Client address (proxy aware), request line, status and elapsed time.
const REQUEST_LOG_FORMAT: &str = "%{r}a \"%r\" %s %Dms";

const CLIENT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);
const KEEP_ALIVE: Duration = Duration::from_secs(5);

/// HTTP service that finds faces, eyes and mouths in remote images.
#[derive(Parser)]
#[command(name = "facedetection")]
struct Cli {
    /// Listen port.
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Listen address.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Directory holding facefinder, puploc and lps/ (searched for when omitted).
    #[arg(short, long)]
    cascades: Option<PathBuf>,

    /// Image download timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_DOWNLOAD_TIMEOUT_SECS)]
    download_timeout: u64,

    /// Largest accepted image in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: u64,

    /// Disable the in-memory response cache.
    #[arg(long)]
    no_cache: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let cascade_dir =
        cascade_resolver::resolve(cli.cascades.as_deref(), Path::new(BUNDLED_CASCADE_DIR))
            .map_err(|e| {
                log::error!("Unable to locate cascades, provide the cascade dir with -c");
                e
            })?;
    let cascades = PicoCascades::load(&cascade_dir).map_err(|e| {
        log::error!(
            "Unable to load cascades from {}, provide the cascade dir with -c",
            cascade_dir.display()
        );
        e
    })?;

    let detector = DetectFacesUseCase::new(
        Arc::new(cascades.face),
        Arc::new(IouDetectionClusterer::new()),
        Arc::new(cascades.pupils),
        Arc::new(cascades.landmarks),
    );
    let downloader = HttpDownloader::new(
        Duration::from_secs(cli.download_timeout),
        cli.max_file_size,
    )?;

    // Held here so the blocking HTTP client is dropped outside the async runtime.
    let state = web::Data::new(AppState::new(Arc::new(downloader), Arc::new(detector)));
    let cache = (!cli.no_cache)
        .then(|| web::Data::new(HttpCache::new(Arc::new(MemoryCacheStore::new()))));

    log::info!(
        "Starting service on {}:{} (cache {})",
        cli.host,
        cli.port,
        if cache.is_some() { "on" } else { "off" }
    );
    actix_web::rt::System::new().block_on(serve(&cli.host, cli.port, state.clone(), cache))?;
    log::warn!("Server stopped");
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.port == 0 {
        return Err("Port must be between 1 and 65535".into());
    }
    if cli.download_timeout == 0 {
        return Err("Download timeout must be at least 1 second".into());
    }
    if cli.max_file_size == 0 {
        return Err("Max file size must be positive".into());
    }
    Ok(())
}

async fn serve(
    host: &str,
    port: u16,
    state: web::Data<AppState>,
    cache: Option<web::Data<HttpCache>>,
) -> std::io::Result<()> {
    HttpServer::new(move || {
        let app = App::new().app_data(state.clone());
        let app = match &cache {
            Some(cache) => app.app_data(cache.clone()),
            None => app,
        };
        app.wrap(from_fn(http_cache::cache_responses))
            .wrap(from_fn(cors::cors))
            .wrap(Logger::new(REQUEST_LOG_FORMAT))
            .configure(api::configure)
    })
    .client_request_timeout(CLIENT_REQUEST_TIMEOUT)
    .keep_alive(KEEP_ALIVE)
    .bind((host, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("facedetection").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.port, 8000);
        assert_eq!(cli.host, "0.0.0.0");
        assert_eq!(cli.cascades, None);
        assert_eq!(cli.download_timeout, 5);
        assert_eq!(cli.max_file_size, 2 * 1024 * 1024);
        assert!(!cli.no_cache);
        assert!(validate(&cli).is_ok());
    }

    #[test]
    fn test_short_flags() {
        let cli = parse(&["-p", "9090", "-c", "/opt/cascades"]);
        assert_eq!(cli.port, 9090);
        assert_eq!(cli.cascades, Some(PathBuf::from("/opt/cascades")));
    }

    #[rstest]
    #[case::zero_port(&["-p", "0"])]
    #[case::zero_timeout(&["--download-timeout", "0"])]
    #[case::zero_size(&["--max-file-size", "0"])]
    fn test_invalid_values_rejected(#[case] args: &[&str]) {
        assert!(validate(&parse(args)).is_err());
    }

    #[test]
    fn test_unknown_flag_is_parse_error() {
        assert!(Cli::try_parse_from(["facedetection", "--verbose-mode"]).is_err());
    }
}
