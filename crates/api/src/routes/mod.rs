pub mod calculator;
pub mod health;
pub mod news;
pub mod paystack;
pub mod portfolio;
pub mod profile;
