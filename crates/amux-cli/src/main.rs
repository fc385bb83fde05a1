mod app;
mod commands;

fn main() {
    let app = app::build_cli();
    let matches = app.get_matches();

    let verbose = matches.get_flag("verbose");
    let json_logs = matches.get_flag("json-logs");
    unsafe {
        std::env::set_var("RUST_LOG", if verbose { "debug" } else { "info" });
    }
    let _guard = amux_logging::init_logging(json_logs, None);

    if let Err(e) = commands::run_command(&matches) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
