pub mod domain;
pub mod ports;
pub mod progress;
pub mod recommend;

pub use domain::{
    Book, Interest, ProgressUpdate, ReadingEntry, RecommendedBook, User, UserAccount,
    UserCredentials,
};
pub use ports::{
    BookMetadataProvider, BookStore, CategoryShuffler, LinkOutcome, PortError, PortResult,
};
pub use progress::{ProgressError, ProgressTracker};
pub use recommend::{RecommendError, Recommender, MAX_RECOMMENDATIONS};

#[cfg(test)]
pub(crate) mod testing;
