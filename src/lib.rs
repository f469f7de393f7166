pub mod category;
pub mod config;
pub mod cube;
pub mod entities;
pub mod export;
pub mod extract;
pub mod importers;
pub mod locator;
pub mod pipeline;
pub mod table;
