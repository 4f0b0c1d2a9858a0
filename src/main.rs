use clap::Parser;
use vidtoascii::app;
use vidtoascii::cli::Args;

fn main() {
    let args = Args::parse();

    // Logs go to stderr; stdout carries only rendered glyphs.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .format_timestamp_micros()
        .init();

    if let Err(e) = app::run(&args) {
        log::debug!("Exiting after error: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
