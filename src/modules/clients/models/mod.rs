mod client;

pub use client::{validate_phone, Client, ClientResponse, CreateClientRequest, ListClientsQuery};
