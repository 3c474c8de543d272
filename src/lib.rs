pub mod auction;
pub mod config;
pub mod database;
pub mod finalizer;
pub mod message_broker;
pub mod notifier;
pub mod repository;
pub mod scheduler;
