//! SoulMatch: matrimonial matching backend.
//!
//! Accounts, biodata profiles, favourites, paid contact reveals, premium upgrades and
//! success stories, served as JSON over HTTP behind bearer-token authentication and an
//! admin role gate.

pub mod app_config;
pub mod biodata;
pub mod contact_request;
pub mod db;
pub mod error;
pub mod favourite;
pub mod middleware;
pub mod orm;
pub mod payment;
pub mod premium;
pub mod success_story;
pub mod token;
pub mod user;
pub mod web;
