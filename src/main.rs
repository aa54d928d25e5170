fn main() {
    if let Err(err) = metalog_merge::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
