#![deny(missing_docs)]
#![doc = "Core identifiers, four-momentum algebra and error types shared by the m2x crates."]

pub mod errors;
pub mod ids;
pub mod momentum;
pub mod rng;

pub use errors::{ErrorInfo, M2xError};
pub use ids::{Line, INITIAL_SENTINELS};
pub use momentum::FourMomentum;
pub use rng::{derive_substream_seed, RngHandle};
