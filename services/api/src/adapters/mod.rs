pub mod db;
pub mod google_books;
pub mod shuffle;

pub use db::PgStore;
pub use google_books::GoogleBooks;
pub use shuffle::ThreadRngShuffler;
