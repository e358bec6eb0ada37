mod tracker;

pub use tracker::VideoRetentionTracker;
