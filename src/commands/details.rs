use std::time::Instant;

use anyhow::Result;
use clap::Args;

use reelscrape::telemetry;

use super::Ctx;

#[derive(Args, Debug)]
pub struct DetailsCmd {
    url: String, // detail page or search-hit target
}

pub async fn run(ctx: &Ctx, args: DetailsCmd) -> Result<()> {
    let started = Instant::now();
    let record = ctx.provider.details(&args.url).await;
    telemetry::details().result(&record, ctx.meta(started))
}
