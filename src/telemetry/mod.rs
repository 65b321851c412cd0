pub mod config;
pub mod ctx;
pub mod ops;

use ctx::LogCtx;

pub fn search() -> LogCtx<ops::search::Search> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn details() -> LogCtx<ops::details::Details> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn episodes() -> LogCtx<ops::episodes::Episodes> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn stream() -> LogCtx<ops::stream::Stream> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn extract() -> LogCtx<ops::extract::Extract> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
