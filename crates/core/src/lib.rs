pub mod clock;
pub mod config;
pub mod counter;
pub mod desk;
pub mod metrics;
pub mod queue;
pub mod request;
pub mod stats;
pub mod testing;

pub use clock::{Clock, SystemClock};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, CountersConfig,
    HistoryConfig, QueueConfig,
};
pub use counter::{Counter, CounterId, CounterStatus, NewCounter};
pub use desk::{
    Announcement, AnnouncementKind, CancellationReceipt, CompletionReceipt, Desk, DeskError,
    ErrorKind, MatchKind, RequestLocation, RequestView, RetiredRequest,
};
pub use queue::PriorityQueue;
pub use request::{
    Category, NewRequest, Priority, Request, RequestId, RequestMetadata, RequestStatus,
};
pub use stats::{CounterSummary, DeskStats, Totals};
