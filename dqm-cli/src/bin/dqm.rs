fn main() {
    if let Err(e) = dqm_cli::run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
