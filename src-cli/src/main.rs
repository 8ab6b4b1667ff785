use clap::Parser;

use pdfsum_cli::Args;

fn main() {
    let args = Args::parse();

    pdfsum_cli::init_logging(&["pdfsum_cli=info", "pdfsum_core=info"]);

    let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    if let Err(e) = rt.block_on(pdfsum_cli::run(args)) {
        tracing::error!("Summarization failed: {:#}", e);
        std::process::exit(1);
    }
}
