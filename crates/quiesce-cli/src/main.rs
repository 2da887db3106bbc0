fn main() {
    if let Err(error) = quiesce_cli::run() {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}
