pub mod archive;
pub mod dates;
pub mod export;
pub mod fetch;
pub mod record;
pub mod stats;
pub mod sync;

pub use archive::*;
pub use dates::*;
pub use export::*;
pub use fetch::*;
pub use record::*;
pub use stats::*;
pub use sync::*;

pub const APP_NAME: &'static str = env!("CARGO_PKG_NAME");
