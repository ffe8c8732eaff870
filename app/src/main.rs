mod cli;
mod global_settings;

fn main() {
    cli::exec();
}
