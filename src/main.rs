mod cli;
mod config;
mod local;
mod tools;
mod utils;

fn main() {
    cli::run();
}
