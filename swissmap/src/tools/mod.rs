mod config_args;
pub mod features;
pub mod serve;
