pub mod http;
pub mod text;

pub use http::*;
pub use text::*;
