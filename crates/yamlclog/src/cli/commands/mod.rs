//! CLI commands

mod check;
mod completions;
mod generate;
mod init;

pub use check::CheckCommand;
pub use completions::CompletionsCommand;
pub use generate::GenerateArgs;
pub use init::InitCommand;
