mod commands;
mod cookies;
mod runner;

pub use commands::Command;
pub use cookies::FileCookieJar;
pub use runner::Runner;
