//! fmtgate CLI application entry point
//!
//! This is the minimal main entry point that delegates to the library.

use clap::Parser;

fn main() {
    // Configure miette for error reporting
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(false)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    let cli = fmtgate::Cli::parse();

    match fmtgate::run(cli) {
        Ok(true) => {}
        // The diff has already been printed
        Ok(false) => std::process::exit(1),
        Err(e) => {
            let miette_error = miette::Report::msg(format!("{e:#}"));
            eprintln!("{miette_error:?}");
            std::process::exit(1);
        }
    }
}
