pub mod menu;
pub mod output;
pub mod repl;
