mod command;
mod input;
mod tui;
mod view;

fn main() -> anyhow::Result<()> {
    command::run()
}
