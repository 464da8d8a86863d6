fn main() {
    if let Err(err) = relget::cli::run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
