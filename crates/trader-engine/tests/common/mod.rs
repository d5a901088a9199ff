//! Recording doubles for the engine collaborators.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};
use trader_core::traits::{ArtifactSink, Brokerage, MarketData, Screener, SignalStrategy};
use trader_core::types::{Bar, Decision, OrderId, OrderRequest, Position, Signal, Timeframe};
use trader_engine::Collaborators;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    IsMarketOpen,
    FetchPosition(String),
    ClosePosition(String),
    CancelAllOrders(String),
    GetBuyingPower,
    PlaceOrder(OrderRequest),
}

pub struct RecordingBroker {
    pub open: bool,
    pub position: Option<Position>,
    pub buying_power: Decimal,
    pub accept_orders: bool,
    calls: Mutex<Vec<Call>>,
}

impl RecordingBroker {
    pub fn new() -> Self {
        Self {
            open: true,
            position: None,
            buying_power: Decimal::from(50_000),
            accept_orders: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn orders(&self) -> Vec<OrderRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::PlaceOrder(order) => Some(order),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Brokerage for RecordingBroker {
    async fn is_market_open(&self) -> bool {
        self.record(Call::IsMarketOpen);
        self.open
    }

    async fn fetch_position(&self, symbol: &str) -> Option<Position> {
        self.record(Call::FetchPosition(symbol.to_string()));
        self.position.clone()
    }

    async fn close_position(&self, symbol: &str) {
        self.record(Call::ClosePosition(symbol.to_string()));
    }

    async fn cancel_all_orders(&self, symbol: &str) {
        self.record(Call::CancelAllOrders(symbol.to_string()));
    }

    async fn get_buying_power(&self) -> Decimal {
        self.record(Call::GetBuyingPower);
        self.buying_power
    }

    async fn place_order(&self, request: OrderRequest) -> Option<OrderId> {
        self.record(Call::PlaceOrder(request));
        self.accept_orders.then(|| OrderId::new("order-1"))
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Serves the same bars for every request and remembers the requests.
pub struct FixedMarketData {
    bars: Vec<Bar>,
    requests: Mutex<Vec<(String, DateTime<Utc>, DateTime<Utc>, Timeframe)>>,
}

impl FixedMarketData {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self {
            bars,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, DateTime<Utc>, DateTime<Utc>, Timeframe)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketData for FixedMarketData {
    async fn get_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timeframe: Timeframe,
    ) -> Vec<Bar> {
        self.requests
            .lock()
            .unwrap()
            .push((symbol.to_string(), start, end, timeframe));
        self.bars.clone()
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub signals: Mutex<Vec<(String, usize)>>,
    pub indexes: Mutex<Vec<Vec<String>>>,
}

#[async_trait]
impl ArtifactSink for RecordingSink {
    async fn write_signals(&self, symbol: &str, signals: &[Signal]) {
        self.signals
            .lock()
            .unwrap()
            .push((symbol.to_string(), signals.len()));
    }

    async fn write_index(&self, symbols: &[String]) {
        self.indexes.lock().unwrap().push(symbols.to_vec());
    }
}

/// Holds every bar except the last, which gets the scripted signal.
pub struct ScriptedStrategy {
    pub last: Option<Signal>,
}

impl SignalStrategy for ScriptedStrategy {
    fn name(&self) -> &str {
        "scripted"
    }

    fn generate(&self, bars: &[Bar]) -> Vec<Signal> {
        let mut signals: Vec<Signal> = bars.iter().copied().map(Signal::hold).collect();
        if let (Some(last), Some(scripted)) = (signals.last_mut(), &self.last) {
            *last = scripted.clone();
        }
        signals
    }
}

pub struct FixedScreener(pub Vec<String>);

#[async_trait]
impl Screener for FixedScreener {
    async fn most_active(&self, top: usize) -> Vec<String> {
        self.0.iter().take(top).cloned().collect()
    }
}

pub fn ts(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, hour, minute, 0).unwrap()
}

pub fn bars(count: usize) -> Vec<Bar> {
    (0..count)
        .map(|i| {
            let close = 100.0 + i as f64 * 0.1;
            Bar::new(ts(7, 14, 0), close - 0.05, close + 0.2, close - 0.2, close, 1000.0)
        })
        .collect()
}

/// A trade signal at `close` with an ATR of 1, 1.1 ATR stop and 1.5 reward ratio.
pub fn trade(decision: Decision, close: f64) -> Signal {
    let mut signal = Signal::hold(Bar::new(ts(7, 15, 0), close + 0.5, close + 1.0, close - 1.0, close, 5000.0));
    signal.decision = decision;
    signal.atr = Some(1.0);
    let (sl, tp) = match decision {
        Decision::Sell => (close + 1.1, close - 1.65),
        _ => (close - 1.1, close + 1.65),
    };
    signal.stop_loss = Some(sl);
    signal.take_profit = Some(tp);
    signal
}

pub struct Doubles {
    pub broker: Arc<RecordingBroker>,
    pub market_data: Arc<FixedMarketData>,
    pub sink: Arc<RecordingSink>,
}

impl Doubles {
    pub fn new(broker: RecordingBroker, bars: Vec<Bar>) -> Self {
        Self {
            broker: Arc::new(broker),
            market_data: Arc::new(FixedMarketData::new(bars)),
            sink: Arc::new(RecordingSink::default()),
        }
    }

    pub fn collaborators(&self, last: Option<Signal>) -> Collaborators {
        Collaborators {
            market_data: self.market_data.clone(),
            broker: self.broker.clone(),
            artifacts: self.sink.clone(),
            strategy: Arc::new(ScriptedStrategy { last }),
        }
    }
}
