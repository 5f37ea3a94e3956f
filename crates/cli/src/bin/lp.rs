use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    printmux_cli::run_wrapper(printmux_cli::lp::run)
}
