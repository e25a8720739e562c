#[macro_use]
extern crate rocket;

use std::{path::PathBuf, sync::Arc};

use rocket::{Build, Rocket};
use rocket_prometheus::PrometheusMetrics;
use serde::Deserialize;
use shared::{ActivityProfile, DEFAULT_WINDOW_DAYS};
use usvg::fontdb;

pub mod consts;
pub mod entrypoints;
pub mod source;
pub mod svg;
pub mod types;

pub use source::{ActivityBreakdown, ContributionSource, MockSource};

/// Loaded from the environment (and `.env`) with `envy`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default)]
    pub activity_profile: ActivityProfile,
    pub seed: Option<u64>,
    #[serde(default)]
    pub simulated_latency_ms: u64,
    pub font_path: Option<PathBuf>,
}

const fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            activity_profile: ActivityProfile::default(),
            seed: None,
            simulated_latency_ms: 0,
            font_path: None,
        }
    }
}

pub fn load_fonts(font_path: Option<&std::path::Path>) -> fontdb::Database {
    let mut font = fontdb::Database::new();
    font.load_system_fonts();
    if let Some(path) = font_path {
        if let Err(e) = font.load_font_file(path) {
            tracing::warn!("Failed to load font {}: {e}", path.display());
        }
    }
    font
}

pub fn build(config: Config) -> anyhow::Result<Rocket<Build>> {
    let fontdb = Arc::new(load_fonts(config.font_path.as_deref()));
    let source: Arc<dyn ContributionSource> = Arc::new(MockSource::from_config(&config));
    build_with(config, source, fontdb)
}

pub fn build_with(
    config: Config,
    source: Arc<dyn ContributionSource>,
    fontdb: Arc<fontdb::Database>,
) -> anyhow::Result<Rocket<Build>> {
    let prometheus = PrometheusMetrics::new();
    let cors = rocket_cors::CorsOptions::default()
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Failed to configure CORS: {e}"))?;

    Ok(rocket::build()
        .attach(prometheus.clone())
        .attach(cors)
        .manage(config)
        .manage(source)
        .manage(fontdb)
        .attach(entrypoints::stage())
        .mount("/metrics", prometheus))
}
