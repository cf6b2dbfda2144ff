use anyhow::Result;
use learngl::lessons::TexturedQuad;

fn main() -> Result<()> {
    learngl::window::launch::<TexturedQuad>()
}
