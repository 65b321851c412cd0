use std::time::Instant;

use anyhow::Result;
use clap::Args;

use reelscrape::telemetry;

use super::Ctx;

#[derive(Args, Debug)]
pub struct StreamCmd {
    url: String, // content page, episode target, or player embed
}

pub async fn run(ctx: &Ctx, args: StreamCmd) -> Result<()> {
    let started = Instant::now();
    let source = ctx.provider.stream(&args.url).await;
    if source.is_none() {
        telemetry::stream().info("ℹ️  No playable source found.");
    }
    telemetry::stream().result(&source, ctx.meta(started))
}
