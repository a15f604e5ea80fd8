pub mod compare;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod registry;
pub mod sample;
pub mod state;
pub mod table;
pub mod trend;
pub mod view;
