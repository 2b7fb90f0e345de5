//! javapp entry point.

fn main() {
    if let Err(e) = javapp::cli::run_cli() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
