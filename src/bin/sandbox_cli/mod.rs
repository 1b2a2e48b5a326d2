//! CLI subcommand implementations for algo-sandbox

pub mod decode;
pub mod inspect;
pub mod output;
pub mod run;
