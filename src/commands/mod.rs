//! `reelscrape` subcommands. Each one runs a single operation and emits one envelope.

use std::sync::Arc;
use std::time::Instant;

use reelscrape::config::ScraperConfig;
use reelscrape::extract::{Extractor, MediaKind};
use reelscrape::fetch::Fetcher;
use reelscrape::output::Meta;
use reelscrape::provider::{self, Provider};
use reelscrape::site::SiteProfile;

pub mod details;
pub mod episodes;
pub mod extract;
pub mod search;
pub mod stream;

/// Resolved once in `main` and shared by every command.
pub struct Ctx {
    pub provider: Arc<dyn Provider>,
    pub extractor: Extractor,
}

impl Ctx {
    pub fn new(profile: SiteProfile, cfg: &ScraperConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let extractor = Extractor::new(profile.clone()).with_image_base(cfg.image_base.clone());
        let provider = provider::build(profile, cfg, fetcher);
        Ctx { provider, extractor }
    }

    pub fn meta(&self, started: Instant) -> Option<Meta> {
        Some(Meta {
            site: Some(self.extractor.profile().name.clone()),
            duration_ms: Some(started.elapsed().as_millis()),
        })
    }
}

#[derive(clap::ValueEnum, Copy, Clone, Debug)]
pub enum KindArg {
    #[value(name = "movie")]
    Movie,
    #[value(name = "tv")]
    Tv,
}

impl From<KindArg> for MediaKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Movie => MediaKind::Movie,
            KindArg::Tv => MediaKind::Series,
        }
    }
}
