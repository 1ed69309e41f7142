//! Version command

/// Run the version command.
pub fn run() {
    println!("silex-deploy {}", env!("CARGO_PKG_VERSION"));
}
