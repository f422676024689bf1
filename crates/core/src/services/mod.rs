pub mod analytics_service;
pub mod budget_service;
pub mod entry_service;
pub mod goal_service;
pub mod normalizer;
pub mod palette_service;

mod resource;
