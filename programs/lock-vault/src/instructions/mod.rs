// =============================================================================
// Instructions Module - Lock Vault
// =============================================================================

pub mod add_reserve;
pub mod admin;
pub mod deposit;
pub mod initialize;
pub mod remove_reserve;
pub mod withdraw;

pub use add_reserve::*;
pub use admin::*;
pub use deposit::*;
pub use initialize::*;
pub use remove_reserve::*;
pub use withdraw::*;
