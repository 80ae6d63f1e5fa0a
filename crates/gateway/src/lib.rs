pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod output;
pub mod prompt;
pub mod state;
