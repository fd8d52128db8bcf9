use std::process;

fn main() {
    if let Err(err) = markdown_report_cli::run() {
        eprintln!("markdown-report error: {err:#}");
        process::exit(1);
    }
}
