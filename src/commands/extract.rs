use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;

use reelscrape::telemetry;
use reelscrape::telemetry::ops::extract::Phase as ExtractPhase;

use super::{Ctx, KindArg};

/// Runs one extraction over a saved document; no network.
#[derive(Args, Debug)]
pub struct ExtractCmd {
    #[arg(value_enum)]
    op: ExtractOp, // which extraction to run
    #[arg(long)] file: PathBuf, // saved HTML or JSON document
    #[arg(long, value_enum)] kind: Option<KindArg>, // search only: media kind filter
}

#[derive(clap::ValueEnum, Clone, Debug)]
pub enum ExtractOp {
    #[value(name = "search")]
    Search,
    #[value(name = "details")]
    Details,
    #[value(name = "episodes")]
    Episodes,
    #[value(name = "stream")]
    Stream,
}

pub fn run(ctx: &Ctx, args: ExtractCmd) -> Result<()> {
    let started = Instant::now();
    let log = telemetry::extract();
    let _g = log
        .root_span_kv([("op", format!("{:?}", args.op)), ("file", args.file.display().to_string())])
        .entered();

    let document = {
        let _s = log.span(&ExtractPhase::ReadFile).entered();
        std::fs::read_to_string(&args.file).with_context(|| format!("reading {}", args.file.display()))?
    };

    let _s = log.span(&ExtractPhase::Extract).entered();
    let ex = &ctx.extractor;
    let meta = || ctx.meta(started);
    match args.op {
        ExtractOp::Search => log.result(&ex.search(&document, args.kind.map(Into::into)), meta()),
        ExtractOp::Details => log.result(&ex.details(&document), meta()),
        ExtractOp::Episodes => log.result(&ex.episodes(&document), meta()),
        ExtractOp::Stream => log.result(&ex.stream(&document), meta()),
    }
}
