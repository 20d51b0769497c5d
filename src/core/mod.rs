pub mod battle;
pub mod error;
pub mod experience;
pub mod factory;
pub mod replay;
pub mod rng;
pub mod state;
pub mod turn;
pub mod utils;
