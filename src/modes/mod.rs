pub mod human;
pub mod schedule;
pub mod simulate;

pub use human::{HumanMode, HumanSettings};
pub use schedule::TickSchedule;
pub use simulate::{SimulateConfig, SimulateMode, SimulationReport};
