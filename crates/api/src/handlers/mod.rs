pub mod jobs;
pub mod trust;
pub mod wallets;
