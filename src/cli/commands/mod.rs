//! Subcommands of the `tictactoe-td` binary

pub mod inspect;
pub mod play;
pub mod train;
