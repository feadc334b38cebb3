//! Simulation engine
//!
//! The engine owns the clock and the live population and drives one simulated
//! day through three phases:
//!
//! - **Not Started → Running** ([`SimulationEngine::start`]): the clock is
//!   rewound to opening, the initial customers are placed at the entrance and
//!   reported, then one unconditional tick transitions everybody without
//!   reaping.
//! - **Running** ([`SimulationEngine::tick`]): while the clock is open, each
//!   tick advances the clock, transitions every customer, reaps the ones at
//!   the checkout, admits arrivals and reports who stands at the entrance.
//!   Once the clock has closed, `tick` refuses with
//!   [`SimulationError::StoreClosed`].
//! - **Running → Finished** ([`SimulationEngine::finish`]): statistics are
//!   frozen and the sink is flushed.
//!
//! Every error is fatal; the engine never skips a customer to keep going.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::customer::{Customer, NameGenerator, Population, RandomNameGenerator};
use crate::events::{ObservationSink, SimulationEvent};
use crate::sim_event;
use crate::simulation::{
    ArrivalPolicy, Clock, SimulationError, SimulationResult, SimulationStatistics,
    UniformArrivals,
};
use crate::store::TransitionTable;
use crate::types::{CustomerId, SimulationConfig, SimulationPhase};

/// Outcome of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick number; the opening tick is 1
    pub tick: u64,
    /// Clock value after advancing
    pub time: NaiveDateTime,
    /// Customers transitioned
    pub moved: usize,
    /// Customers removed at the checkout
    pub departed: usize,
    /// Customers admitted at the entrance
    pub arrived: usize,
    /// Live customers at the end of the tick
    pub population: usize,
}

/// Time-stepped driver for one simulated day
pub struct SimulationEngine {
    table: Arc<TransitionTable>,
    clock: Clock,
    population: Population,
    arrivals: Box<dyn ArrivalPolicy>,
    names: Box<dyn NameGenerator>,
    rng: Box<dyn RngCore>,
    initial_customers: usize,
    phase: SimulationPhase,
    ticks: u64,
    statistics: SimulationStatistics,
    started_at: Option<Instant>,
}

impl fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("clock", &self.clock)
            .field("population", &self.population.size())
            .field("arrivals", &self.arrivals)
            .field("names", &self.names)
            .field("initial_customers", &self.initial_customers)
            .field("phase", &self.phase)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

impl SimulationEngine {
    /// Create an engine for the configured day over a shared table
    #[instrument(skip(config, table), fields(initial_customers = config.initial_customers, locations = table.len()))]
    pub fn new(config: &SimulationConfig, table: Arc<TransitionTable>) -> SimulationResult<Self> {
        config.validate()?;
        let clock = Clock::from_config(config)?;

        let rng: Box<dyn RngCore> = if let Some(seed) = config.seed {
            info!("Using deterministic seed: {}", seed);
            Box::new(StdRng::seed_from_u64(seed))
        } else {
            debug!("Using entropy-based random seed");
            Box::new(StdRng::from_entropy())
        };

        let statistics = SimulationStatistics::new(clock.opens_at(), clock.closes_at());

        Ok(Self {
            table,
            clock,
            population: Population::new(),
            arrivals: Box::new(UniformArrivals::new(config.max_arrivals)),
            names: Box::new(RandomNameGenerator::new()),
            rng,
            initial_customers: config.initial_customers,
            phase: SimulationPhase::NotStarted,
            ticks: 0,
            statistics,
            started_at: None,
        })
    }

    /// Replace the random source
    pub fn with_rng<R: RngCore + 'static>(mut self, rng: R) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Replace the arrival policy
    pub fn with_arrival_policy<A: ArrivalPolicy + 'static>(mut self, policy: A) -> Self {
        self.arrivals = Box::new(policy);
        self
    }

    /// Replace the name generator
    pub fn with_name_generator<N: NameGenerator + 'static>(mut self, names: N) -> Self {
        self.names = Box::new(names);
        self
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    /// The clock
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Live customers
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// The shared transition table
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Ticks processed so far, including the opening tick
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Statistics collected so far
    pub fn statistics(&self) -> &SimulationStatistics {
        &self.statistics
    }

    /// Whether the main loop would take another tick
    pub fn is_open(&self) -> bool {
        self.clock.is_open()
    }

    fn expect_phase(&self, expected: SimulationPhase) -> SimulationResult<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SimulationError::InvalidPhase { expected, actual: self.phase })
        }
    }

    fn emit<S: ObservationSink + ?Sized>(
        sink: &mut S,
        event: SimulationEvent,
    ) -> SimulationResult<()> {
        debug!(kind = event.kind(), time = %event.time(), customer = ?event.customer_id(), "observation");
        sink.record(&event)
    }

    fn admit(&mut self, time: NaiveDateTime) -> Customer {
        let id = CustomerId::from_rng(&mut *self.rng);
        let name = self.names.next_name(&mut *self.rng);
        Customer::new(name, &self.table, time).with_id(id)
    }

    /// Open the store: place the initial customers and take the opening tick
    #[instrument(skip(self, sink))]
    pub fn start<S: ObservationSink + ?Sized>(&mut self, sink: &mut S) -> SimulationResult<()> {
        self.expect_phase(SimulationPhase::NotStarted)?;
        self.started_at = Some(Instant::now());

        self.clock.reset_to_open();
        let opened = self.clock.current();
        for _ in 0..self.initial_customers {
            let customer = self.admit(opened);
            self.population.add(customer);
        }
        self.statistics.initial_customers = self.population.size();
        self.phase = SimulationPhase::Running;

        sim_event!(
            info,
            "Store opened",
            time = tracing::field::display(opened),
            customers = self.population.size()
        );
        Self::emit(sink, SimulationEvent::Opened { time: opened, customers: self.population.size() })?;
        for customer in self.population.iter() {
            Self::emit(sink, SimulationEvent::InitialPosition { time: opened, customer: customer.snapshot() })?;
        }

        // Opening tick: everybody moves once, nobody is reaped yet.
        self.ticks = 1;
        let time = self.clock.advance()?;
        Self::emit(sink, SimulationEvent::TickStarted { tick: self.ticks, time })?;
        let movements = self.population.transition_all(&self.table, &mut *self.rng)?;
        for movement in movements {
            self.statistics.record_movement(&movement);
            Self::emit(
                sink,
                SimulationEvent::Moved {
                    time,
                    customer: movement.customer,
                    name: movement.name,
                    from: movement.from,
                    to: movement.to,
                },
            )?;
        }
        self.statistics.record_population(self.population.size());

        Ok(())
    }

    /// Take one tick of the main loop
    #[instrument(level = "debug", skip(self, sink), fields(tick = self.ticks + 1))]
    pub fn tick<S: ObservationSink + ?Sized>(&mut self, sink: &mut S) -> SimulationResult<TickReport> {
        self.expect_phase(SimulationPhase::Running)?;
        if !self.clock.is_open() {
            return Err(SimulationError::StoreClosed { time: self.clock.current() });
        }

        let time = self.clock.advance()?;
        self.ticks += 1;
        let tick = self.ticks;
        Self::emit(sink, SimulationEvent::TickStarted { tick, time })?;

        let movements = self.population.transition_all(&self.table, &mut *self.rng)?;
        let moved = movements.len();
        for movement in movements {
            self.statistics.record_movement(&movement);
            Self::emit(
                sink,
                SimulationEvent::Moved {
                    time,
                    customer: movement.customer,
                    name: movement.name,
                    from: movement.from,
                    to: movement.to,
                },
            )?;
        }

        let departed = self.population.reap_terminal();
        for customer in &departed {
            Self::emit(sink, SimulationEvent::Departed { time, customer: customer.snapshot() })?;
        }
        self.statistics.record_departures(&departed);

        if self.population.is_empty() {
            sim_event!(
                warn,
                "No customers left in the store",
                tick = tick,
                time = tracing::field::display(time)
            );
            self.statistics.record_exhausted();
            Self::emit(sink, SimulationEvent::PopulationExhausted { tick, time })?;
        }

        let arrived = self.arrivals.sample_arrivals(&mut *self.rng);
        for _ in 0..arrived {
            let customer = self.admit(time);
            Self::emit(sink, SimulationEvent::Arrived { time, customer: customer.snapshot() })?;
            self.population.add(customer);
        }
        self.statistics.record_arrivals(arrived);

        for customer in self.population.at(self.table.entrance().as_str()) {
            Self::emit(sink, SimulationEvent::ReadyToShop { time, customer: customer.snapshot() })?;
        }

        let population = self.population.size();
        self.statistics.record_population(population);

        Ok(TickReport { tick, time, moved, departed: departed.len(), arrived, population })
    }

    /// Close the store and freeze the statistics
    #[instrument(skip(self, sink))]
    pub fn finish<S: ObservationSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> SimulationResult<&SimulationStatistics> {
        self.expect_phase(SimulationPhase::Running)?;
        self.phase = SimulationPhase::Finished;

        let elapsed = self.started_at.map(|started| started.elapsed()).unwrap_or_default();
        self.statistics.finalize(self.ticks, self.population.size(), elapsed);

        let time = self.clock.current();
        Self::emit(
            sink,
            SimulationEvent::Closed { time, ticks: self.ticks, remaining: self.population.size() },
        )?;
        sink.flush()?;

        sim_event!(
            info,
            "Store closed",
            time = tracing::field::display(time),
            ticks = self.ticks,
            remaining = self.population.size()
        );
        if !self.statistics.is_balanced() {
            warn!("Customer counts do not balance: {:?}", self.statistics);
        }

        Ok(&self.statistics)
    }

    /// Run the whole day: open, tick while the clock is open, close
    #[instrument(skip(self, sink))]
    pub fn run<S: ObservationSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> SimulationResult<SimulationStatistics> {
        self.start(sink)?;
        while self.clock.is_open() {
            self.tick(sink)?;
        }
        Ok(self.finish(sink)?.clone())
    }
}
