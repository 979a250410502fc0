pub mod gate_steps;
pub mod guard_steps;
pub mod service_steps;
