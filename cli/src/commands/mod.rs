//! CLI Commands

mod decrypt;
mod init;
mod stake;
mod status;

pub use decrypt::{DecryptCommand, DecryptTarget};
pub use init::InitCommand;
pub use stake::{ClaimCommand, StakeCommand, WithdrawCommand};
pub use status::StatusCommand;
