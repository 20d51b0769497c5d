pub mod growth;
pub mod moves;
pub mod species;
pub mod type_chart;
