pub mod simple;

pub use simple::{choose_highest_power, first_healthy_reserve, run_auto_battle};
