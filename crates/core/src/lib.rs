pub mod dispatch;
pub mod history;
pub mod rate_limit;
pub mod render;
pub mod search;
pub mod surface;
pub mod widget;

pub use dispatch::SearchDispatcher;
pub use history::{History, HistoryEntry};
pub use rate_limit::{RateLimitPolicy, RateLimiter};
pub use search::{SearchClient, SearchError, SearchRequest, SearchResponse, Suggestion};
pub use surface::{Element, MemorySurface, Node, Surface};
pub use widget::{Autocomplete, Key, ListState, WidgetConfig};
