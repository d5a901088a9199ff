//! Trading engine.
//!
//! A [`Trader`] polls one symbol on a [`ScheduledTask`]: it checks that the
//! market is open, regenerates signals over the latest bars and then either
//! closes an opposed position or enters a new bracket order. The
//! [`Orchestrator`] runs one trader per symbol of a [`Universe`].

mod orchestrator;
mod schedule;
mod trader;

pub use orchestrator::{Orchestrator, Universe};
pub use schedule::ScheduledTask;
pub use trader::{
    previous_trading_day, Collaborators, CycleOutcome, PositionManager, Trader, TraderSettings,
};
