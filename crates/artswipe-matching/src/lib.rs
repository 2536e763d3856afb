//! Swipe recording and match formation.
//!
//! [`SwipeRecorder`] persists one directional preference. After a like is
//! persisted, [`MatchDetector`] checks for a reciprocal like and creates the
//! match once; [`MatchQueue`] runs that check in the background so the
//! request that triggered it never waits on it.

pub mod detector;
pub mod pair;
pub mod queue;
pub mod recorder;
pub mod store;

pub use detector::{MatchDetector, MatchOutcome};
pub use pair::MatchPair;
pub use queue::{Enqueued, MatchQueue, MatchQueueConfig, MatchWorkers};
pub use recorder::{SwipeOutcome, SwipeRecorder};
pub use store::SwipeStore;
