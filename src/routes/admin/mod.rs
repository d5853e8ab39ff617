mod api;
mod broadcasts;
mod dashboard;
mod logout;
pub use api::*;
pub use broadcasts::*;
pub use dashboard::*;
pub use logout::*;
