//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    env_logger::init();
    if let Err(err) = storyroute_cli::run() {
        eprintln!("storyroute: {err}");
        std::process::exit(1);
    }
}
