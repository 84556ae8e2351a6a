pub mod server;

pub mod db;

pub mod monitoring;
pub mod analysis;
pub mod notifications;
pub mod checker;

pub mod web;
