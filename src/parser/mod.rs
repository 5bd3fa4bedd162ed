pub mod helpers;
pub mod locate;
pub mod record;
pub mod segment;
pub mod stream;

pub use locate::*;
pub use record::*;
pub use segment::*;
pub use stream::*;
