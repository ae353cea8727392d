pub mod alert;
pub mod analysis;
pub mod config;
pub mod feed;
pub mod metadata;
pub mod price;
pub mod processor;
