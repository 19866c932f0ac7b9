pub mod broadcast;
pub mod clock;
pub mod config;
pub mod history;
pub mod messages;
pub mod notifier;
pub mod outbox;
pub mod scheduler;

pub use broadcast::{ChangeBroadcaster, NagChange};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::load_configuration;
pub use history::{HistoryLog, HistoryStorage, KvHistoryStorage, MemoryHistoryStorage};
pub use notifier::{CollectNotifier, NotificationCenter, NotificationRequest};
pub use outbox::OutboxNotifier;
pub use scheduler::{BannerState, NagDecision, NagScheduler};
