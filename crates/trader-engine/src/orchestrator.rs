//! Starts and stops one trader per symbol as a group.

use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};
use trader_core::traits::Screener;

use crate::{Collaborators, Trader, TraderSettings};

/// Where the set of traded symbols comes from.
#[derive(Clone)]
pub enum Universe {
    /// Ask the screener for the most actively traded symbols on every start
    MostActive {
        screener: Arc<dyn Screener>,
        top: usize,
    },
    /// Always trade the same symbols
    Fixed(Vec<String>),
}

impl Universe {
    async fn resolve(&self) -> Vec<String> {
        let symbols = match self {
            Universe::MostActive { screener, top } => {
                info!(top, "Fetching most active stocks");
                screener.most_active(*top).await
            }
            Universe::Fixed(symbols) => symbols.clone(),
        };

        let mut seen = HashSet::new();
        symbols
            .into_iter()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect()
    }
}

/// Owns the running traders.
pub struct Orchestrator {
    collaborators: Collaborators,
    universe: Universe,
    settings: TraderSettings,
    traders: Vec<Trader>,
}

impl Orchestrator {
    pub fn new(collaborators: Collaborators, universe: Universe, settings: TraderSettings) -> Self {
        Self {
            collaborators,
            universe,
            settings,
            traders: Vec::new(),
        }
    }

    /// Resolve the universe, publish the symbol index and start one trader
    /// per symbol. A running group is shut down first, so no symbol ever has
    /// two cycles in flight. Returns the number of traders started.
    pub async fn start_trading(&mut self) -> usize {
        if self.is_running() {
            warn!("Trading already running, restarting");
            self.shutdown().await;
        }

        info!(
            broker = self.collaborators.broker.name(),
            market_data = self.collaborators.market_data.name(),
            strategy = self.collaborators.strategy.name(),
            "Starting trading"
        );
        let symbols = self.universe.resolve().await;
        if symbols.is_empty() {
            warn!("Symbol universe is empty");
        }

        self.collaborators.artifacts.write_index(&symbols).await;

        for symbol in symbols {
            let mut trader = Trader::new(symbol, self.collaborators.clone(), self.settings.clone());
            trader.start();
            self.traders.push(trader);
        }

        info!(traders = self.traders.len(), "Trading started");
        self.traders.len()
    }

    /// Stop every trader and discard them. In-flight cycles finish in the
    /// background.
    pub fn stop_trading(&mut self) {
        info!(traders = self.traders.len(), "Stopping trading");
        for mut trader in self.traders.drain(..) {
            let _ = trader.stop();
        }
    }

    /// Stop every trader and wait for in-flight cycles to finish.
    pub async fn shutdown(&mut self) {
        let tasks: Vec<_> = self
            .traders
            .drain(..)
            .filter_map(|mut trader| trader.stop())
            .collect();

        info!(traders = tasks.len(), "Shutting down");
        join_all(tasks.into_iter().map(|task| task.join())).await;
    }

    pub fn is_running(&self) -> bool {
        !self.traders.is_empty()
    }

    /// Symbols currently being traded.
    pub fn symbols(&self) -> Vec<&str> {
        self.traders.iter().map(Trader::symbol).collect()
    }
}
