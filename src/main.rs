fn main() {
    if let Err(err) = wr_profile::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
