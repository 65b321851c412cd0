pub mod search;
pub mod details;
pub mod episodes;
pub mod stream;
pub mod extract;
