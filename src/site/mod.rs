pub mod profile;

pub use profile::{Backend, ContentPath, SiteProfile};
