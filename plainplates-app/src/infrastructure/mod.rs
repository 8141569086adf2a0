pub mod auth;
pub mod db;
pub mod mistral;
pub mod security;
