// Clients: people who book appointments and buy on credit

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::Client;
pub use repositories::ClientRepository;
pub use services::ClientService;
