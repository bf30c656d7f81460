mod config;
mod error;
mod library;
mod logging;
mod media;
mod playback;
mod runtime;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
