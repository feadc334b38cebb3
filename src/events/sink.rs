//! Observation sinks
//!
//! The engine reports through the [`ObservationSink`] trait so the same run
//! can feed a console, a JSON-lines stream, or an in-memory log that tests
//! assert on directly.

use std::io::Write;

use crate::events::SimulationEvent;
use crate::simulation::SimulationResult;
use crate::types::CustomerId;

/// Receiver of per-tick observations
pub trait ObservationSink {
    /// Record one event
    fn record(&mut self, event: &SimulationEvent) -> SimulationResult<()>;

    /// Flush buffered output, called once when the run finishes
    fn flush(&mut self) -> SimulationResult<()> {
        Ok(())
    }
}

impl<S: ObservationSink + ?Sized> ObservationSink for &mut S {
    fn record(&mut self, event: &SimulationEvent) -> SimulationResult<()> {
        (**self).record(event)
    }

    fn flush(&mut self) -> SimulationResult<()> {
        (**self).flush()
    }
}

impl<S: ObservationSink + ?Sized> ObservationSink for Box<S> {
    fn record(&mut self, event: &SimulationEvent) -> SimulationResult<()> {
        (**self).record(event)
    }

    fn flush(&mut self) -> SimulationResult<()> {
        (**self).flush()
    }
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ObservationSink for NullSink {
    fn record(&mut self, _event: &SimulationEvent) -> SimulationResult<()> {
        Ok(())
    }
}

/// In-memory, ordered event collector
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<SimulationEvent>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in emission order
    pub fn events(&self) -> &[SimulationEvent] {
        &self.events
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events of one kind (see [`SimulationEvent::kind`])
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a SimulationEvent> + 'a {
        self.events.iter().filter(move |e| e.kind() == kind)
    }

    /// Number of events of one kind
    pub fn count(&self, kind: &str) -> usize {
        self.of_kind(kind).count()
    }

    /// Events concerning one customer
    pub fn for_customer(&self, id: CustomerId) -> impl Iterator<Item = &SimulationEvent> + '_ {
        self.events.iter().filter(move |e| e.customer_id() == Some(id))
    }
}

impl ObservationSink for EventLog {
    fn record(&mut self, event: &SimulationEvent) -> SimulationResult<()> {
        self.events.push(event.clone());
        Ok(())
    }
}

/// Human-readable console lines
#[derive(Debug)]
pub struct TextSink<W: Write> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    /// Write lines to `writer`
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn format(event: &SimulationEvent) -> String {
        match event {
            SimulationEvent::Opened { time, customers } => {
                format!("Store opens at {} with {} customers", time, customers)
            }
            SimulationEvent::InitialPosition { customer, .. } => {
                format!("Customer {} starts at {}", customer.name, customer.location)
            }
            SimulationEvent::TickStarted { time, .. } => time.to_string(),
            SimulationEvent::Moved { name, to, .. } => {
                format!("Customer {} is in the {} section", name, to)
            }
            SimulationEvent::Departed { customer, .. } => format!(
                "Customer {} is in the {} section and is removed",
                customer.name, customer.location
            ),
            SimulationEvent::Arrived { customer, .. } => {
                format!("Customer {} arrives at the {}", customer.name, customer.location)
            }
            SimulationEvent::ReadyToShop { customer, .. } => format!(
                "Customer {} is in the {} section and happy to start shopping",
                customer.name, customer.location
            ),
            SimulationEvent::PopulationExhausted { time, .. } => {
                format!("No customers left in the store at {}", time)
            }
            SimulationEvent::Closed { time, ticks, remaining } => format!(
                "Store closes at {} after {} ticks with {} customers inside",
                time, ticks, remaining
            ),
        }
    }
}

impl<W: Write> ObservationSink for TextSink<W> {
    fn record(&mut self, event: &SimulationEvent) -> SimulationResult<()> {
        writeln!(self.writer, "{}", Self::format(event))?;
        Ok(())
    }

    fn flush(&mut self) -> SimulationResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// One JSON object per line
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Write JSON lines to `writer`
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ObservationSink for JsonLinesSink<W> {
    fn record(&mut self, event: &SimulationEvent) -> SimulationResult<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> SimulationResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
