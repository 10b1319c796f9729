#![forbid(unsafe_code)]

fn main() {
    pinchcal_harness::logging::init();
    if let Err(error) = pinchcal_harness::run_from_env() {
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}
