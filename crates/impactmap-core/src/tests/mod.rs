mod config;
mod export;
mod snapshot;
