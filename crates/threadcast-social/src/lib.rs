pub mod dry_run;
pub mod error;
pub mod poster;
pub mod traits;
pub mod x;

pub use dry_run::DryRunClient;
pub use error::{PostError, PostThreadError};
pub use poster::{Poster, PosterConfig};
pub use traits::{CreatedPost, PostClient};
pub use x::XClient;
