/// Core functionality modules
///
/// Time and id sources for new records, and note search.

pub mod clock;
pub mod ids;
pub mod searcher;
pub mod testing;

pub use clock::{Clock, SystemClock};
pub use ids::{IdGenerator, UuidGenerator};
pub use searcher::{SearchResult, Searcher, DEFAULT_SEARCH_LIMIT};
