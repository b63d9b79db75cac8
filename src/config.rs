// src/config.rs
use std::net::IpAddr;

/// Runtime configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub admin_username: String,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://firstchoice.db".to_string());
        let host = std::env::var("HOST")
            .ok()
            .and_then(|h| h.parse().ok())
            .unwrap_or_else(|| "127.0.0.1".parse().expect("valid literal"));
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let admin_username =
            std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "Admin".to_string());
        let admin_password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "firstChoice".to_string());

        Config {
            database_url,
            host,
            port,
            admin_username,
            admin_password,
        }
    }
}
