mod app;
mod keys;
mod render;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}
