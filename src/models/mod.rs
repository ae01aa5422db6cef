pub mod analytics;
pub mod content;
pub mod loaders;

pub use analytics::{AnalyticsBundle, ChannelRole, ChannelSummary, LeaderboardEntry, TopVideo};
pub use content::{ContentBundle, ContentSource, GeneratedContent, VideoIdea};
pub use loaders::{load_analytics, load_generated_content};
