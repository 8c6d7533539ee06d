//! Evolutionary operators on whole networks: weight mutation and two-parent
//! weight crossover.

pub mod crossover;
pub mod mutation;
