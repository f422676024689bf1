pub mod analytics;
pub mod amount;
pub mod budget;
pub mod chart;
pub mod domain;
pub mod entry;
pub mod goal;
pub mod settings;
