const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

#[derive(Debug, Clone)]
pub struct BroadcastConfig {
    /// Events buffered per campaign before slow subscribers start lagging
    pub channel_capacity: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}
