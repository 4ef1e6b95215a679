use std::collections::HashMap;

use crate::record::LogRecord;

/// Key to value map that remembers the order in which keys were first written.
///
/// Reads never create entries; only [`Tally::entry`] does, starting from `V::default()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally<V> {
    index: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V: Default> Tally<V> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn entry(&mut self, key: &str) -> &mut V {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.index.insert(key.to_string(), slot);
                self.entries.push((key.to_string(), V::default()));
                slot
            }
        };
        &mut self.entries[slot].1
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Default> Default for Tally<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EndpointTotals {
    pub count: u64,
    pub total_response_time: f64,
}

impl EndpointTotals {
    pub fn add(&mut self, response_time: f64) {
        self.count += 1;
        self.total_response_time += response_time;
    }

    /// Mean response time, `0.0` when nothing was recorded.
    pub fn average(&self) -> f64 {
        if self.count > 0 {
            self.total_response_time / self.count as f64
        } else {
            0.0
        }
    }
}

pub type EndpointStats = Tally<EndpointTotals>;

pub type AgentStats = Tally<u64>;

impl EndpointStats {
    pub fn record(&mut self, endpoint: &str, response_time: f64) {
        self.entry(endpoint).add(response_time);
    }

    pub fn total_requests(&self) -> u64 {
        self.iter().map(|(_, totals)| totals.count).sum()
    }
}

impl AgentStats {
    pub fn record(&mut self, agent: &str) {
        *self.entry(agent) += 1;
    }

    pub fn total(&self) -> u64 {
        self.iter().map(|(_, count)| *count).sum()
    }
}

/// Everything one aggregation pass produces: filtered endpoint statistics plus every
/// decoded record in read order, filtered or not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub endpoint_stats: EndpointStats,
    pub records: Vec<LogRecord>,
}
