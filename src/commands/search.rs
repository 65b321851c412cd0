use std::time::Instant;

use anyhow::Result;
use clap::Args;

use reelscrape::telemetry;

use super::{Ctx, KindArg};

#[derive(Args, Debug)]
pub struct SearchCmd {
    query: String, // free-text title query
    #[arg(long, value_enum)] kind: Option<KindArg>, // keep only movies or only series
}

pub async fn run(ctx: &Ctx, args: SearchCmd) -> Result<()> {
    let started = Instant::now();
    let hits = ctx.provider.search(&args.query, args.kind.map(Into::into)).await;
    telemetry::search().result(&hits, ctx.meta(started))
}
