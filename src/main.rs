fn main() {
    if let Err(error) = actas_console::run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
