use anyhow::Result;
use learngl::lessons::HelloTriangle;

fn main() -> Result<()> {
    learngl::window::launch::<HelloTriangle>()
}
