use crate::{Cli, Command};
use shared::error::SharedError;

pub mod init;
pub mod show;
pub mod simulate;

pub fn run(cli: Cli) -> Result<(), SharedError> {
    match cli.command {
        Command::Init(args) => init::run(&args),
        Command::Show(args) => show::run(&args),
        Command::Simulate(args) => {
            let report = simulate::run(&args)?;
            simulate::print(&report);
            Ok(())
        }
    }
}
