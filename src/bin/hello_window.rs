use anyhow::Result;
use learngl::lessons::HelloWindow;

fn main() -> Result<()> {
    learngl::window::launch::<HelloWindow>()
}
