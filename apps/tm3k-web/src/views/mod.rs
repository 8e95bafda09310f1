pub mod login;
pub mod main;
mod tasks;
