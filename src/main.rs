fn main() {
    if let Err(err) = lexi::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
