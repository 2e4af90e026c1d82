fn main() {
    if let Err(err) = process_flow_renderer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
