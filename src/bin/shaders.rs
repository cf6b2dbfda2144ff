use anyhow::Result;
use learngl::lessons::UniformColor;

fn main() -> Result<()> {
    learngl::window::launch::<UniformColor>()
}
