use std::time::Instant;

use anyhow::Result;
use clap::Args;

use reelscrape::telemetry;

use super::Ctx;

#[derive(Args, Debug)]
pub struct EpisodesCmd {
    url: String, // series page or search-hit target
}

pub async fn run(ctx: &Ctx, args: EpisodesCmd) -> Result<()> {
    let started = Instant::now();
    let eps = ctx.provider.episodes(&args.url).await;
    telemetry::episodes().result(&eps, ctx.meta(started))
}
