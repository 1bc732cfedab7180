//! Bounded navigation history and frequency ranking

use std::collections::{HashMap, VecDeque};

/// The most recent route interactions, oldest dropped at capacity
#[derive(Debug, Clone)]
pub struct InteractionHistory {
    routes: VecDeque<String>,
    capacity: usize,
}

impl InteractionHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            routes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, route: impl Into<String>) {
        if self.routes.len() == self.capacity {
            self.routes.pop_front();
        }
        self.routes.push_back(route.into());
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(String::as_str)
    }

    /// Routes by descending visit count. Equal counts rank the most
    /// recently seen route first.
    pub fn ranked(&self) -> Vec<(String, usize)> {
        // route -> (count, last position)
        let mut freq: HashMap<&str, (usize, usize)> = HashMap::new();
        for (pos, route) in self.routes.iter().enumerate() {
            let slot = freq.entry(route.as_str()).or_insert((0, pos));
            slot.0 += 1;
            slot.1 = pos;
        }

        let mut ranked: Vec<_> = freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(b.1 .1.cmp(&a.1 .1)));
        ranked
            .into_iter()
            .map(|(route, (count, _))| (route.to_string(), count))
            .collect()
    }
}
